//! Field rules shared by the command handlers.
//!
//! Names and titles are trimmed; content is kept verbatim. Lengths count
//! characters. Uniqueness compares lowercased text but callers store the
//! original casing.

use noterecord_store::{Category, Note};

use crate::error::CommandError;

pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_NOTE_TITLE_LENGTH: usize = 200;
pub const MAX_NOTE_CONTENT_LENGTH: usize = 100_000;

/// Trimmed, non-empty category name within the length cap.
pub fn category_name(raw: &str) -> Result<String, CommandError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CommandError::invalid_input("Category name is required"));
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CommandError::invalid_input(format!(
            "Category name exceeds maximum length of {} characters",
            MAX_CATEGORY_NAME_LENGTH
        )));
    }
    Ok(name.to_string())
}

/// Trimmed, non-empty note title within the length cap.
pub fn note_title(raw: &str) -> Result<String, CommandError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CommandError::invalid_input("Note title is required"));
    }
    if title.chars().count() > MAX_NOTE_TITLE_LENGTH {
        return Err(CommandError::invalid_input(format!(
            "Note title exceeds maximum length of {} characters",
            MAX_NOTE_TITLE_LENGTH
        )));
    }
    Ok(title.to_string())
}

pub fn note_content(content: &str) -> Result<(), CommandError> {
    // Byte length bounds the char count; skip counting for short bodies.
    if content.len() > MAX_NOTE_CONTENT_LENGTH
        && content.chars().count() > MAX_NOTE_CONTENT_LENGTH
    {
        return Err(CommandError::invalid_input(format!(
            "Note content exceeds maximum length of {} characters",
            MAX_NOTE_CONTENT_LENGTH
        )));
    }
    Ok(())
}

/// Case-insensitive text equality.
pub fn same_text(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

pub fn unique_category_name(existing: &[Category], name: &str) -> Result<(), CommandError> {
    if existing.iter().any(|c| same_text(&c.name, name)) {
        return Err(CommandError::duplicate("Category already exists"));
    }
    Ok(())
}

/// `title` must not match another note in the same category. `exclude` skips
/// the note being renamed.
pub fn unique_note_title(
    siblings: &[Note],
    title: &str,
    exclude: Option<&str>,
) -> Result<(), CommandError> {
    let clash = siblings
        .iter()
        .filter(|n| Some(n.id.as_str()) != exclude)
        .any(|n| same_text(&n.title, title));
    if clash {
        return Err(CommandError::duplicate(
            "Note title already exists in this category",
        ));
    }
    Ok(())
}
