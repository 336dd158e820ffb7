//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default HTTP port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8124;

/// Paths to all Note Record data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Persisted categories + notes document (`data/notes.json`).
    pub notes_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            notes_file: root.join("notes.json"),
            root,
        };
        std::fs::create_dir_all(&paths.root)?;
        Ok(paths)
    }

    /// Data paths for an existing directory, without touching the filesystem.
    pub fn existing(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            notes_file: root.join("notes.json"),
            root,
        }
    }
}

/// Top-level Note Record configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecordConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
}

impl NoteRecordConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT value: {raw:?}")))?,
            Err(_) => DEFAULT_PORT,
        };

        let data_paths = DataPaths::new(data_dir)?;

        Ok(Self { port, data_paths })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_paths_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested/data");

        let paths = DataPaths::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(paths.notes_file, root.join("notes.json"));
    }

    #[test]
    fn test_existing_does_not_create() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("missing");

        let paths = DataPaths::existing(&root);
        assert!(!root.exists());
        assert_eq!(paths.root, root);
    }
}
