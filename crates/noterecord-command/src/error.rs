//! Structured command rejections.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed, empty or out-of-range caller data.
    InvalidInput,
    /// Uniqueness violation.
    Duplicate,
    /// Referenced entity (or the store itself) is unavailable.
    NotFound,
    /// Delete blocked by existing children.
    NotEmpty,
    /// Operation failure not otherwise classified.
    Error,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Duplicate => "duplicate",
            Self::NotFound => "not_found",
            Self::NotEmpty => "not_empty",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A rejected command: error code plus a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct CommandError {
    #[serde(rename = "code")]
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Duplicate, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn not_empty(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotEmpty, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let err = CommandError::not_empty("Category has 2 notes. Delete all notes first.");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "not_empty");
        assert_eq!(json["message"], "Category has 2 notes. Delete all notes first.");
    }

    #[test]
    fn test_display() {
        let err = CommandError::duplicate("Category already exists");
        assert_eq!(err.to_string(), "duplicate: Category already exists");
    }

    #[test]
    fn test_codes_match_serde() {
        for kind in [
            ErrorKind::InvalidInput,
            ErrorKind::Duplicate,
            ErrorKind::NotFound,
            ErrorKind::NotEmpty,
            ErrorKind::Error,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.code());
        }
    }
}
