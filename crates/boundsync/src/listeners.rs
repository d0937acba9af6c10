//! Weak-reference listener registry shared by windows and the leader tracker.
use std::{
    fmt,
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Registry of weakly-held listeners.
///
/// Listeners are held by [`Weak`] so a registry never keeps its subscribers
/// alive. Dead entries are pruned lazily on the next fan-out.
pub struct Listeners<T: ?Sized> {
    /// Next id to hand out.
    next_id: AtomicU64,
    /// Registered listeners in subscription order.
    entries: Mutex<Vec<(ListenerId, Weak<T>)>>,
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Listeners<T> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: Weak<T>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.entries.lock().push((id, listener));
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.entries.lock().retain(|(entry, _)| *entry != id);
    }

    /// Live listeners, in subscription order.
    ///
    /// The internal lock is released before this returns, so callers may
    /// invoke listeners that subscribe or unsubscribe re-entrantly.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        let mut stale = false;
        let live: Vec<Arc<T>> = {
            let entries = self.entries.lock();
            entries
                .iter()
                .filter_map(|(_, weak)| {
                    let strong = weak.upgrade();
                    stale |= strong.is_none();
                    strong
                })
                .collect()
        };
        if stale {
            self.prune();
        }
        live
    }

    /// Number of registered entries, including ones not yet pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop entries whose listener is gone.
    fn prune(&self) {
        self.entries.lock().retain(|(_, weak)| weak.strong_count() > 0);
    }
}
