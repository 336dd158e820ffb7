//! Notification bus — payload-free "document changed" fan-out.
//!
//! Observers register a zero-argument callback and get back a
//! [`Subscription`]. After every successful persisted mutation the store calls
//! [`NotificationBus::notify`], which runs each callback in registration order.
//! Observers re-read the store to find out what changed.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::warn;

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Callback)>,
}

/// Registry of change observers.
#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Arc<Mutex<Registry>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It stays registered until the returned handle is
    /// unsubscribed or dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(callback)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
            active: AtomicBool::new(true),
        }
    }

    /// Call every registered callback in registration order.
    ///
    /// Callbacks run outside the registry lock. A panicking callback is logged
    /// and skipped; the rest still run.
    pub fn notify(&self) {
        let listeners: Vec<(u64, Callback)> = self.registry.lock().listeners.clone();

        for (id, callback) in listeners {
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                warn!("Notification listener {} panicked; continuing", id);
            }
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Handle for a registered callback.
#[must_use = "dropping a Subscription unsubscribes its callback"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
    active: AtomicBool,
}

impl Subscription {
    /// Remove the callback. Calling this more than once is a no-op.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().listeners.retain(|(id, _)| *id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst) && self.registry.strong_count() > 0
    }

    /// Keep the callback registered for as long as the bus lives.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
