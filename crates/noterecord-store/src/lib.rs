//! Note Record Store — JSON-backed category/note document with change notifications.

pub mod notify;
pub mod reconcile;
pub mod store;
pub mod types;

pub use notify::{NotificationBus, Subscription};
pub use reconcile::{KnownIds, Reconciliation};
pub use store::NoteStore;
pub use types::*;
