//! Command dispatch: validate every field, then make exactly one store call.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use noterecord_store::{NoteStore, NoteUpdate};

use crate::command::{Command, Response};
use crate::error::CommandError;
use crate::validate;

/// Runs [`Command`]s against a shared [`NoteStore`].
///
/// Commands are executed one at a time, so the checks made during validation
/// still hold when the store call happens.
pub struct CommandHandler {
    store: Option<Arc<NoteStore>>,
    gate: Mutex<()>,
}

impl CommandHandler {
    pub fn new(store: Arc<NoteStore>) -> Self {
        Self {
            store: Some(store),
            gate: Mutex::new(()),
        }
    }

    /// A handler with no store behind it; every command fails with `not_found`.
    pub fn unavailable() -> Self {
        Self {
            store: None,
            gate: Mutex::new(()),
        }
    }

    /// Validate and apply one command.
    pub fn execute(&self, command: Command) -> Result<Response, CommandError> {
        let _gate = self.gate.lock();
        let name = command.name();
        let mutation = command.is_mutation();

        let result = self.dispatch(command);
        match &result {
            Ok(response) if mutation => info!("{} applied: {}", name, describe(response)),
            Ok(_) => debug!("{} served", name),
            Err(e) => debug!("{} rejected ({}): {}", name, e.kind, e.message),
        }
        result
    }

    fn dispatch(&self, command: Command) -> Result<Response, CommandError> {
        let store = self
            .store
            .as_deref()
            .ok_or_else(|| CommandError::not_found("Store not initialized"))?;

        match command {
            Command::GetData => Ok(Response::Data(store.snapshot())),
            Command::CreateCategory { name } => create_category(store, &name),
            Command::CreateNote {
                category_id,
                title,
                content,
                pinned,
            } => create_note(store, &category_id, &title, &content, pinned),
            Command::UpdateNote {
                note_id,
                title,
                content,
                pinned,
            } => update_note(store, &note_id, title, content, pinned),
            Command::DeleteNote { note_id } => delete_note(store, &note_id),
            Command::DeleteCategory { category_id } => delete_category(store, &category_id),
        }
    }
}

impl std::fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandler")
            .field("store", &self.store.as_ref().map(|s| s.path().to_path_buf()))
            .finish()
    }
}

fn describe(response: &Response) -> String {
    match response {
        Response::Data(snapshot) => format!(
            "{} categories, {} notes",
            snapshot.categories.len(),
            snapshot.notes.len()
        ),
        Response::Category(category) => format!("category {}", category.id),
        Response::Note(note) => format!("note {}", note.id),
        Response::Deleted(_) => "deleted".to_string(),
    }
}

fn create_category(store: &NoteStore, raw_name: &str) -> Result<Response, CommandError> {
    let name = validate::category_name(raw_name)?;
    validate::unique_category_name(&store.categories(), &name)?;

    let category = store
        .create_category(&name)
        .map_err(|e| CommandError::error(format!("Failed to create category: {}", e)))?;
    Ok(Response::Category(category))
}

fn create_note(
    store: &NoteStore,
    category_id: &str,
    raw_title: &str,
    content: &str,
    pinned: bool,
) -> Result<Response, CommandError> {
    let title = validate::note_title(raw_title)?;
    validate::note_content(content)?;

    if store.get_category(category_id).is_none() {
        return Err(CommandError::not_found("Category not found"));
    }
    validate::unique_note_title(&store.notes_in_category(category_id), &title, None)?;

    match store.create_note(category_id, &title, content, pinned) {
        Ok(Some(note)) => Ok(Response::Note(note)),
        Ok(None) => Err(CommandError::error("Failed to create note")),
        Err(e) => Err(CommandError::error(format!("Failed to create note: {}", e))),
    }
}

fn update_note(
    store: &NoteStore,
    note_id: &str,
    title: Option<String>,
    content: Option<String>,
    pinned: Option<bool>,
) -> Result<Response, CommandError> {
    let note = store
        .get_note(note_id)
        .ok_or_else(|| CommandError::not_found("Note not found"))?;

    let title = match title {
        Some(raw) => {
            let title = validate::note_title(&raw)?;
            validate::unique_note_title(
                &store.notes_in_category(&note.category_id),
                &title,
                Some(note_id),
            )?;
            Some(title)
        }
        None => None,
    };

    if let Some(content) = &content {
        validate::note_content(content)?;
    }

    let update = NoteUpdate {
        title,
        content,
        pinned,
    };
    match store.update_note(note_id, update) {
        Ok(Some(note)) => Ok(Response::Note(note)),
        Ok(None) => Err(CommandError::error("Failed to update note")),
        Err(e) => Err(CommandError::error(format!("Failed to update note: {}", e))),
    }
}

fn delete_note(store: &NoteStore, note_id: &str) -> Result<Response, CommandError> {
    if store.get_note(note_id).is_none() {
        return Err(CommandError::not_found("Note not found"));
    }

    match store.delete_note(note_id) {
        Ok(true) => Ok(Response::deleted()),
        Ok(false) => Err(CommandError::error("Failed to delete note")),
        Err(e) => Err(CommandError::error(format!("Failed to delete note: {}", e))),
    }
}

fn delete_category(store: &NoteStore, category_id: &str) -> Result<Response, CommandError> {
    if store.get_category(category_id).is_none() {
        return Err(CommandError::not_found("Category not found"));
    }

    let members = store.note_count_in_category(category_id);
    if members > 0 {
        return Err(CommandError::not_empty(format!(
            "Category has {} notes. Delete all notes first.",
            members
        )));
    }

    match store.delete_category(category_id) {
        Ok(true) => Ok(Response::deleted()),
        Ok(false) => Err(CommandError::error("Failed to delete category")),
        Err(e) => Err(CommandError::error(format!("Failed to delete category: {}", e))),
    }
}
