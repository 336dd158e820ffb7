//! Command requests and successful responses.

use serde::{Deserialize, Serialize};

use noterecord_store::{Category, Note, Snapshot};

/// One request against the store, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    GetData,
    CreateCategory {
        name: String,
    },
    CreateNote {
        category_id: String,
        title: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        pinned: bool,
    },
    UpdateNote {
        note_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pinned: Option<bool>,
    },
    DeleteNote {
        note_id: String,
    },
    DeleteCategory {
        category_id: String,
    },
}

impl Command {
    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetData => "get_data",
            Self::CreateCategory { .. } => "create_category",
            Self::CreateNote { .. } => "create_note",
            Self::UpdateNote { .. } => "update_note",
            Self::DeleteNote { .. } => "delete_note",
            Self::DeleteCategory { .. } => "delete_category",
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::GetData)
    }
}

/// Body of a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}

/// Successful command result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Data(Snapshot),
    Category(Category),
    Note(Note),
    Deleted(Deleted),
}

impl Response {
    pub(crate) fn deleted() -> Self {
        Self::Deleted(Deleted { deleted: true })
    }

    pub fn into_category(self) -> Option<Category> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }

    pub fn into_note(self) -> Option<Note> {
        match self {
            Self::Note(note) => Some(note),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Snapshot> {
        match self {
            Self::Data(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
