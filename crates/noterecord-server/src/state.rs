//! Shared application state.

use std::sync::Arc;

use noterecord_command::CommandHandler;
use noterecord_core::NoteRecordConfig;
use noterecord_store::{NoteStore, Subscription};

use crate::tracker::ChangeTracker;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: NoteRecordConfig,
    pub store: Arc<NoteStore>,
    pub commands: CommandHandler,
    pub tracker: ChangeTracker,
    /// Keeps the tracker registered on the store's bus.
    _tracker_subscription: Subscription,
}

impl AppState {
    pub fn new(config: NoteRecordConfig, store: Arc<NoteStore>) -> Self {
        let commands = CommandHandler::new(store.clone());
        let (tracker, subscription) = ChangeTracker::attach(&store);

        Self {
            config,
            store,
            commands,
            tracker,
            _tracker_subscription: subscription,
        }
    }
}
