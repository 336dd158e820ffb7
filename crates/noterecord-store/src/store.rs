//! JSON-file store for categories and notes.
//!
//! The whole document is rewritten on every mutation. Mutations are applied to
//! a working copy; the copy only replaces the live document once the file has
//! been written, so a failed write leaves memory and disk unchanged.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::notify::{NotificationBus, Subscription};
use crate::types::*;
use noterecord_core::{Error, Result};

/// Persistent store with id indices and a change notification bus.
pub struct NoteStore {
    path: PathBuf,
    state: RwLock<Indexed>,
    /// Serializes snapshot, write, swap and notify.
    commit: Mutex<()>,
    bus: NotificationBus,
}

/// The live document plus lookup indices derived from it.
struct Indexed {
    document: Document,
    category_index: HashMap<String, usize>,
    note_index: HashMap<String, usize>,
    notes_by_category: HashMap<String, Vec<usize>>,
}

impl Indexed {
    fn new(document: Document) -> Self {
        let category_index = document
            .categories
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id.clone(), pos))
            .collect();

        let mut note_index = HashMap::with_capacity(document.notes.len());
        let mut notes_by_category: HashMap<String, Vec<usize>> = HashMap::new();
        for (pos, note) in document.notes.iter().enumerate() {
            note_index.insert(note.id.clone(), pos);
            notes_by_category
                .entry(note.category_id.clone())
                .or_default()
                .push(pos);
        }

        Self {
            document,
            category_index,
            note_index,
            notes_by_category,
        }
    }

    fn category(&self, id: &str) -> Option<&Category> {
        self.category_index
            .get(id)
            .map(|&pos| &self.document.categories[pos])
    }

    fn note(&self, id: &str) -> Option<&Note> {
        self.note_index.get(id).map(|&pos| &self.document.notes[pos])
    }

    fn member_count(&self, category_id: &str) -> usize {
        self.notes_by_category
            .get(category_id)
            .map_or(0, |positions| positions.len())
    }
}

impl NoteStore {
    /// Open or create the store backed by `path`.
    ///
    /// A missing file yields an empty document. A file that cannot be parsed,
    /// or carries an unsupported version, is moved aside to `<path>.corrupt`
    /// and the store starts empty. If it cannot be moved, opening fails rather
    /// than risk overwriting it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::Storage(e.to_string()))?;
        }

        let document = load_document(&path)?;

        let issues = document.integrity_issues();
        if !issues.is_empty() {
            warn!(
                "Loaded document has {} integrity issues (run `noterecord validate`): {}",
                issues.len(),
                issues.join("; ")
            );
        }

        info!(
            "NoteStore initialized: {} categories, {} notes, path={}",
            document.categories.len(),
            document.notes.len(),
            path.display()
        );

        Ok(Self {
            path,
            state: RwLock::new(Indexed::new(document)),
            commit: Mutex::new(()),
            bus: NotificationBus::new(),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bus notified after every successful persisted mutation.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Shorthand for `self.bus().subscribe(callback)`.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    pub fn get_category(&self, id: &str) -> Option<Category> {
        self.state.read().category(id).cloned()
    }

    pub fn get_note(&self, id: &str) -> Option<Note> {
        self.state.read().note(id).cloned()
    }

    /// Notes belonging to a category, in document order.
    pub fn notes_in_category(&self, category_id: &str) -> Vec<Note> {
        let state = self.state.read();
        state
            .notes_by_category
            .get(category_id)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| state.document.notes[pos].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of notes referencing a category.
    pub fn note_count_in_category(&self, category_id: &str) -> usize {
        self.state.read().member_count(category_id)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.state.read().document.categories.clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.read().document.notes.clone()
    }

    /// Note ids in document order.
    pub fn note_ids(&self) -> Vec<String> {
        self.state
            .read()
            .document
            .notes
            .iter()
            .map(|n| n.id.clone())
            .collect()
    }

    /// Categories and notes, read under one lock.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Snapshot {
            categories: state.document.categories.clone(),
            notes: state.document.notes.clone(),
        }
    }

    /// The full document as it would be persisted.
    pub fn document(&self) -> Document {
        self.state.read().document.clone()
    }

    pub fn counts(&self) -> StoreCounts {
        let state = self.state.read();
        StoreCounts {
            categories: state.document.categories.len(),
            notes: state.document.notes.len(),
            pinned_notes: state.document.notes.iter().filter(|n| n.pinned).count(),
        }
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Append a new category. Name uniqueness is the caller's policy.
    pub fn create_category(&self, name: &str) -> Result<Category> {
        let created = self.commit(|_, next| {
            let category = Category {
                id: generate_id(),
                name: name.to_string(),
                created_at: Utc::now(),
            };
            next.categories.push(category.clone());
            Some(category)
        })?;

        let category = created
            .ok_or_else(|| Error::Storage("category creation produced no result".into()))?;
        debug!("Created category: {} ({})", category.name, category.id);
        Ok(category)
    }

    /// Append a new note. Returns `None` if the category does not exist.
    pub fn create_note(
        &self,
        category_id: &str,
        title: &str,
        content: &str,
        pinned: bool,
    ) -> Result<Option<Note>> {
        let created = self.commit(|current, next| {
            if current.category(category_id).is_none() {
                warn!("Category not found: {}", category_id);
                return None;
            }

            let now = Utc::now();
            let note = Note {
                id: generate_id(),
                category_id: category_id.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                pinned,
                created_at: now,
                updated_at: now,
            };
            next.notes.push(note.clone());
            Some(note)
        })?;

        if let Some(note) = &created {
            debug!("Created note: {} in category {}", note.title, category_id);
        }
        Ok(created)
    }

    /// Apply the supplied fields of `update` and refresh `updated_at`, with a
    /// single write. Returns `None` if the note does not exist.
    pub fn update_note(&self, id: &str, update: NoteUpdate) -> Result<Option<Note>> {
        if update.is_empty() {
            debug!("Update for note {} has no fields, refreshing updated_at only", id);
        }

        let updated = self.commit(|current, next| {
            let Some(&pos) = current.note_index.get(id) else {
                warn!("Note not found for update: {}", id);
                return None;
            };

            let note = &mut next.notes[pos];
            if let Some(title) = update.title {
                note.title = title;
            }
            if let Some(content) = update.content {
                note.content = content;
            }
            if let Some(pinned) = update.pinned {
                note.pinned = pinned;
            }
            note.touch(Utc::now());
            Some(note.clone())
        })?;

        if updated.is_some() {
            debug!("Updated note: {}", id);
        }
        Ok(updated)
    }

    /// Remove a note. Returns `false` if it does not exist.
    pub fn delete_note(&self, id: &str) -> Result<bool> {
        let deleted = self.commit(|current, next| {
            let Some(&pos) = current.note_index.get(id) else {
                warn!("Note not found: {}", id);
                return None;
            };
            next.notes.remove(pos);
            Some(())
        })?;

        if deleted.is_some() {
            debug!("Deleted note: {}", id);
        }
        Ok(deleted.is_some())
    }

    /// Remove an empty category.
    ///
    /// Returns `false` without writing if the category does not exist or still
    /// has notes. Notes are never deleted on a category's behalf.
    pub fn delete_category(&self, id: &str) -> Result<bool> {
        let deleted = self.commit(|current, next| {
            let Some(&pos) = current.category_index.get(id) else {
                warn!("Category not found: {}", id);
                return None;
            };
            let members = current.member_count(id);
            if members > 0 {
                warn!("Cannot delete category {}: has {} notes", id, members);
                return None;
            }
            next.categories.remove(pos);
            Some(())
        })?;

        if deleted.is_some() {
            debug!("Deleted category: {}", id);
        }
        Ok(deleted.is_some())
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    /// Rewrite the backing file from the live document and notify observers.
    pub fn save(&self) -> Result<()> {
        let _commit = self.commit.lock();
        let document = self.state.read().document.clone();
        self.write_document(&document)?;
        self.bus.notify();
        Ok(())
    }

    /// Run `apply` against a copy of the live document. If it returns `Some`,
    /// persist the copy, make it live and notify; otherwise change nothing.
    fn commit<T>(
        &self,
        apply: impl FnOnce(&Indexed, &mut Document) -> Option<T>,
    ) -> Result<Option<T>> {
        let _commit = self.commit.lock();

        let (out, next) = {
            let current = self.state.read();
            let mut next = current.document.clone();
            match apply(&*current, &mut next) {
                Some(out) => (out, next),
                None => return Ok(None),
            }
        };

        self.write_document(&next)?;
        *self.state.write() = Indexed::new(next);
        self.bus.notify();
        Ok(Some(out))
    }

    /// Write via a synced sibling temp file and rename, so readers of the file
    /// never see a partial document.
    fn write_document(&self, document: &Document) -> Result<()> {
        let data = serde_json::to_vec_pretty(document)?;
        let tmp = sibling(&self.path, ".tmp");

        write_synced(&tmp, &data).map_err(|e| {
            warn!("Failed to write {}: {}", tmp.display(), e);
            let _ = std::fs::remove_file(&tmp);
            Error::Storage(format!("write {}: {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            warn!("Failed to replace {}: {}", self.path.display(), e);
            let _ = std::fs::remove_file(&tmp);
            Error::Storage(format!("rename onto {}: {}", self.path.display(), e))
        })?;

        debug!(
            "Saved {} categories and {} notes to {}",
            document.categories.len(),
            document.notes.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = self.counts();
        f.debug_struct("NoteStore")
            .field("path", &self.path)
            .field("categories", &counts.categories)
            .field("notes", &counts.notes)
            .field("bus", &self.bus)
            .finish()
    }
}

fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Write `data` and flush it to disk before returning.
fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Read the persisted document, falling back to an empty one.
///
/// Anything that is not a current-version document (bad JSON, invalid UTF-8,
/// unknown version) is moved aside first. Only I/O errors other than a
/// missing file, or a failed move, are returned.
fn load_document(path: &Path) -> Result<Document> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No document at {}, starting empty", path.display());
            return Ok(Document::default());
        }
        Err(e) => return Err(Error::Io(e)),
    };

    match serde_json::from_slice::<Document>(&raw) {
        Ok(document) if document.version == STORAGE_VERSION => Ok(document),
        Ok(document) => {
            warn!(
                "Unsupported document version {} (expected {}) in {}",
                document.version,
                STORAGE_VERSION,
                path.display()
            );
            quarantine(path)?;
            Ok(Document::default())
        }
        Err(e) => {
            warn!("Unreadable document {}: {}", path.display(), e);
            quarantine(path)?;
            Ok(Document::default())
        }
    }
}

/// Move an unusable document out of the way so the next save cannot clobber it.
/// Refuses to continue if the move fails.
fn quarantine(path: &Path) -> Result<()> {
    let target = sibling(path, ".corrupt");
    std::fs::rename(path, &target).map_err(|e| {
        warn!("Failed to move aside {}: {}", path.display(), e);
        Error::Storage(format!(
            "cannot move unreadable {} to {}: {}",
            path.display(),
            target.display(),
            e
        ))
    })?;
    warn!("Moved {} to {}", path.display(), target.display());
    Ok(())
}
