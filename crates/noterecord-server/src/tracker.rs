//! Observer that mirrors which categories and notes exist.
//!
//! Each notification re-reads the store and reconciles the previously known id
//! sets against the live ones, logging what appeared and disappeared.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use noterecord_store::{KnownIds, NoteStore, Subscription};

/// Counters exposed through `/api/stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub notifications: u64,
    pub tracked_categories: usize,
    pub tracked_notes: usize,
}

struct TrackerState {
    categories: KnownIds,
    notes: KnownIds,
    notifications: u64,
}

impl TrackerState {
    fn sync(&mut self, store: &NoteStore) {
        self.notifications += 1;

        let category_ids: Vec<String> = store.categories().into_iter().map(|c| c.id).collect();
        let changes = self
            .categories
            .reconcile(category_ids.iter().map(String::as_str));
        for id in &changes.added {
            info!("Category appeared: {}", id);
        }
        for id in &changes.removed {
            info!("Category removed: {}", id);
        }

        let note_ids = store.note_ids();
        let changes = self.notes.reconcile(note_ids.iter().map(String::as_str));
        for id in &changes.added {
            info!("Note appeared: {}", id);
        }
        for id in &changes.removed {
            info!("Note removed: {}", id);
        }
    }
}

/// Handle for reading the tracker's counters.
pub struct ChangeTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl ChangeTracker {
    /// Seed from the store's current contents and subscribe to its bus.
    ///
    /// The callback holds only a weak reference to the store.
    pub fn attach(store: &Arc<NoteStore>) -> (Self, Subscription) {
        let categories = store.categories();
        let note_ids = store.note_ids();
        let state = Arc::new(Mutex::new(TrackerState {
            categories: KnownIds::seeded(categories.iter().map(|c| c.id.as_str())),
            notes: KnownIds::seeded(note_ids.iter().map(String::as_str)),
            notifications: 0,
        }));

        let weak = Arc::downgrade(store);
        let shared = state.clone();
        let subscription = store.subscribe(move || {
            if let Some(store) = weak.upgrade() {
                shared.lock().sync(&store);
            }
        });

        (Self { state }, subscription)
    }

    pub fn stats(&self) -> TrackerStats {
        let state = self.state.lock();
        TrackerStats {
            notifications: state.notifications,
            tracked_categories: state.categories.len(),
            tracked_notes: state.notes.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noterecord_store::NoteUpdate;

    fn test_store() -> (Arc<NoteStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::open(dir.path().join("notes.json")).unwrap();
        (Arc::new(store), dir)
    }

    #[test]
    fn test_seeded_from_existing_contents() {
        let (store, _dir) = test_store();
        let cat = store.create_category("Work").unwrap();
        store.create_note(&cat.id, "Plan", "", false).unwrap();

        let (tracker, _sub) = ChangeTracker::attach(&store);
        let stats = tracker.stats();
        assert_eq!(stats.tracked_categories, 1);
        assert_eq!(stats.tracked_notes, 1);
        assert_eq!(stats.notifications, 0);
    }

    #[test]
    fn test_follows_additions_and_removals() {
        let (store, _dir) = test_store();
        let (tracker, _sub) = ChangeTracker::attach(&store);

        let cat = store.create_category("Work").unwrap();
        let note = store.create_note(&cat.id, "Plan", "", false).unwrap().unwrap();
        assert_eq!(tracker.stats().tracked_notes, 1);
        assert_eq!(tracker.stats().tracked_categories, 1);

        store
            .update_note(
                &note.id,
                NoteUpdate {
                    pinned: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(tracker.stats().tracked_notes, 1);

        store.delete_note(&note.id).unwrap();
        assert_eq!(tracker.stats().tracked_notes, 0);

        store.delete_category(&cat.id).unwrap();
        let stats = tracker.stats();
        assert_eq!(stats.notifications, 5);
        assert_eq!(stats.tracked_categories, 0);
        assert_eq!(stats.tracked_notes, 0);
    }

    #[test]
    fn test_dropped_subscription_stops_tracking() {
        let (store, _dir) = test_store();
        let (tracker, sub) = ChangeTracker::attach(&store);
        drop(sub);

        store.create_category("Work").unwrap();
        assert_eq!(tracker.stats().notifications, 0);
        assert!(store.bus().is_empty());
    }
}
