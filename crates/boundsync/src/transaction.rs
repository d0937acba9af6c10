//! Group transaction leadership.
//!
//! While a group moves, exactly one member is the leader: the window whose
//! own bounds changes drive everyone else. The leader record also carries
//! the cause of the move, which decides how the move ends.
use std::{collections::HashMap, fmt, sync::Weak};

use boundsync_ids::{GroupId, WindowIdentity};
use parking_lot::Mutex;
use tracing::debug;

use crate::listeners::{ListenerId, Listeners};

/// What started a group move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeaderCause {
    /// An interactive drag or resize by the user.
    User,
    /// An animation on the leader.
    Animation,
    /// A programmatic bounds change.
    Api,
}

impl fmt::Display for LeaderCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Animation => "animation",
            Self::Api => "api",
        })
    }
}

/// The current leader of a group move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupLeader {
    /// Group being moved.
    pub group: GroupId,
    /// Leading window.
    pub window: WindowIdentity,
    /// Cause of the move.
    pub cause: LeaderCause,
}

/// Receiver of end-of-group-transaction broadcasts.
pub trait TransactionListener: Send + Sync {
    /// The leader of `group` finished its move. The leader record is still
    /// present while this runs.
    fn on_transaction_end(&self, group: &GroupId);
}

/// Arbiter of group move leadership.
pub trait LeaderTracker: Send + Sync {
    /// Current leader of `group`.
    fn leader(&self, group: &GroupId) -> Option<GroupLeader>;
    /// Record `window` as the leader of `group`.
    fn set_leader(&self, group: &GroupId, window: &WindowIdentity, cause: LeaderCause);
    /// Forget the leader of `group`.
    fn clear_group(&self, group: &GroupId);
    /// Broadcast the end of `group`'s transaction to every subscriber.
    fn notify_end_transaction(&self, group: &GroupId);
    /// Register for end-of-transaction broadcasts.
    fn subscribe(&self, listener: Weak<dyn TransactionListener>) -> ListenerId;
    /// Undo a [`Self::subscribe`].
    fn unsubscribe(&self, id: ListenerId);
}

/// In-process leader tracker.
///
/// Records are keyed by group, so a group never has more than one leader.
/// Broadcasts run synchronously on the caller's stack with no lock held.
#[derive(Default)]
pub struct GroupTransactions {
    /// Leader record per group.
    leaders: Mutex<HashMap<GroupId, GroupLeader>>,
    /// End-of-transaction subscribers.
    listeners: Listeners<dyn TransactionListener>,
}

impl GroupTransactions {
    /// An empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups with a recorded leader.
    #[must_use]
    pub fn active_groups(&self) -> usize {
        self.leaders.lock().len()
    }

    /// Number of registered broadcast subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl LeaderTracker for GroupTransactions {
    fn leader(&self, group: &GroupId) -> Option<GroupLeader> {
        self.leaders.lock().get(group).cloned()
    }

    fn set_leader(&self, group: &GroupId, window: &WindowIdentity, cause: LeaderCause) {
        debug!(group = %group, window = %window, cause = %cause, "group leader set");
        self.leaders.lock().insert(
            group.clone(),
            GroupLeader {
                group: group.clone(),
                window: window.clone(),
                cause,
            },
        );
    }

    fn clear_group(&self, group: &GroupId) {
        if self.leaders.lock().remove(group).is_some() {
            debug!(group = %group, "group leader cleared");
        }
    }

    fn notify_end_transaction(&self, group: &GroupId) {
        let listeners = self.listeners.snapshot();
        debug!(group = %group, listeners = listeners.len(), "end group transaction");
        for listener in listeners {
            listener.on_transaction_end(group);
        }
    }

    fn subscribe(&self, listener: Weak<dyn TransactionListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.unsubscribe(id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct Seen {
        groups: Mutex<Vec<(GroupId, Option<WindowIdentity>)>>,
        tracker: Mutex<Option<Arc<GroupTransactions>>>,
    }

    impl TransactionListener for Seen {
        fn on_transaction_end(&self, group: &GroupId) {
            let leader = self
                .tracker
                .lock()
                .as_ref()
                .and_then(|t| t.leader(group))
                .map(|l| l.window);
            self.groups.lock().push((group.clone(), leader));
        }
    }

    #[test]
    fn one_leader_per_group() {
        let tracker = GroupTransactions::new();
        let group = GroupId::new("g");
        let a = WindowIdentity::new("app", "a");
        let b = WindowIdentity::new("app", "b");
        tracker.set_leader(&group, &a, LeaderCause::User);
        tracker.set_leader(&group, &b, LeaderCause::Api);
        assert_eq!(tracker.active_groups(), 1);
        let leader = tracker.leader(&group).expect("leader");
        assert_eq!(leader.window, b);
        assert_eq!(leader.cause, LeaderCause::Api);
        tracker.clear_group(&group);
        assert!(tracker.leader(&group).is_none());
    }

    #[test]
    fn broadcast_sees_leader_before_clear() {
        let tracker = Arc::new(GroupTransactions::new());
        let seen = Arc::new(Seen::default());
        *seen.tracker.lock() = Some(tracker.clone());
        let listener: Arc<dyn TransactionListener> = seen.clone();
        let id = tracker.subscribe(Arc::downgrade(&listener));

        let group = GroupId::new("g");
        let a = WindowIdentity::new("app", "a");
        tracker.set_leader(&group, &a, LeaderCause::User);
        tracker.notify_end_transaction(&group);
        tracker.clear_group(&group);

        assert_eq!(seen.groups.lock().clone(), vec![(group.clone(), Some(a))]);

        tracker.unsubscribe(id);
        tracker.notify_end_transaction(&group);
        assert_eq!(seen.groups.lock().len(), 1);
        *seen.tracker.lock() = None;
    }
}
