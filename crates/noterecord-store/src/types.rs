//! Data types for categories, notes, and the persisted document.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written to (and required from) the persisted document.
pub const STORAGE_VERSION: u32 = 1;

/// A named grouping of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A titled text record belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub content: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Refresh `updated_at`, never letting it fall behind `created_at`.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Partial note update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
}

impl NoteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.pinned.is_none()
    }
}

/// The full persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

fn default_version() -> u32 {
    STORAGE_VERSION
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            categories: Vec::new(),
            notes: Vec::new(),
        }
    }
}

impl Document {
    /// List every violated document invariant as a human-readable line.
    ///
    /// An empty result means the document is consistent: every note points at
    /// an existing category, names and titles are unique ignoring case, ids are
    /// unique, and no note was updated before it was created.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut ids: HashSet<&str> = HashSet::new();

        let mut names: HashMap<String, &str> = HashMap::new();
        for category in &self.categories {
            if !ids.insert(category.id.as_str()) {
                issues.push(format!("Duplicate id: {}", category.id));
            }
            if let Some(other) = names.insert(category.name.to_lowercase(), category.id.as_str()) {
                issues.push(format!(
                    "Categories {} and {} share the name {:?}",
                    other, category.id, category.name
                ));
            }
        }

        let category_ids: HashSet<&str> =
            self.categories.iter().map(|c| c.id.as_str()).collect();
        let mut titles: HashMap<(&str, String), &str> = HashMap::new();
        for note in &self.notes {
            if !ids.insert(note.id.as_str()) {
                issues.push(format!("Duplicate id: {}", note.id));
            }
            if !category_ids.contains(note.category_id.as_str()) {
                issues.push(format!(
                    "Note {} references missing category {}",
                    note.id, note.category_id
                ));
            }
            let key = (note.category_id.as_str(), note.title.to_lowercase());
            if let Some(other) = titles.insert(key, note.id.as_str()) {
                issues.push(format!(
                    "Notes {} and {} share the title {:?} in category {}",
                    other, note.id, note.title, note.category_id
                ));
            }
            if note.updated_at < note.created_at {
                issues.push(format!("Note {} was updated before it was created", note.id));
            }
        }

        issues
    }
}

/// Categories and notes as returned to callers (no storage version).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub categories: Vec<Category>,
    pub notes: Vec<Note>,
}

/// Store-level statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCounts {
    pub categories: usize,
    pub notes: usize,
    pub pinned_notes: usize,
}
