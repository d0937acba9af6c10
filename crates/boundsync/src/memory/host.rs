use std::{collections::BTreeMap, sync::Arc};

use boundsync_ids::{GroupId, WindowIdentity};
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::{
    bounds::Rect,
    config::TrackerCfg,
    memory::{AnimationSet, MemoryTransactions, MemoryWindow, RecordingRelay, WindowGroups},
    native::{NativeWindow, WindowEvent},
    payload::BoundsChange,
    reposition::TransactionFactory,
    tracker::{BoundsTracker, TrackerServices},
    transaction::GroupTransactions,
};

/// A tracked window and its native stand-in.
struct Entry {
    /// Native stand-in.
    window: Arc<MemoryWindow>,
    /// Attached tracker.
    tracker: Arc<BoundsTracker>,
}

/// A complete in-memory host: windows, trackers and every collaborator.
///
/// Notifications from all windows are also funnelled into one channel so
/// their global order can be observed with [`Self::drain_notifications`].
pub struct MemoryHost {
    /// Leader tracker.
    leaders: Arc<GroupTransactions>,
    /// Group registry.
    groups: Arc<WindowGroups>,
    /// Animation state.
    animations: Arc<AnimationSet>,
    /// Deferred-move relay.
    relay: Arc<RecordingRelay>,
    /// Position transaction factory.
    transactions: MemoryTransactions,
    /// Services handed to each tracker.
    services: TrackerServices,
    /// Tracked windows.
    entries: BTreeMap<WindowIdentity, Entry>,
    /// Sender cloned into each window.
    sink: Sender<BoundsChange>,
    /// Receiver of every notification.
    notifications: Receiver<BoundsChange>,
}

impl MemoryHost {
    /// A host with no windows, using `cfg` to pick the repositioner.
    #[must_use]
    pub fn new(cfg: TrackerCfg) -> Self {
        let leaders = Arc::new(GroupTransactions::new());
        let groups = Arc::new(WindowGroups::new());
        let animations = Arc::new(AnimationSet::new());
        let relay = Arc::new(RecordingRelay::new());
        let transactions = MemoryTransactions::new();
        let factory: Arc<dyn TransactionFactory> = Arc::new(transactions.clone());
        let services = TrackerServices {
            leaders: leaders.clone(),
            groups: groups.clone(),
            animations: animations.clone(),
            relay: relay.clone(),
            repositioner: cfg.repositioner(Some(factory), relay.clone()),
        };
        let (sink, notifications) = unbounded();
        Self {
            leaders,
            groups,
            animations,
            relay,
            transactions,
            services,
            entries: BTreeMap::new(),
            sink,
            notifications,
        }
    }

    /// Create a window at `rect` and attach a tracker to it.
    pub fn add_window(
        &mut self,
        identity: WindowIdentity,
        id: u32,
        handle: isize,
        rect: Rect,
    ) -> Arc<BoundsTracker> {
        let window = Arc::new(MemoryWindow::new(id, handle, rect).with_sink(self.sink.clone()));
        self.groups.register(identity.clone(), window.clone());
        self.transactions.register(window.clone());
        let tracker = BoundsTracker::attach(identity.clone(), window.clone(), self.services.clone());
        self.entries.insert(
            identity,
            Entry {
                window,
                tracker: tracker.clone(),
            },
        );
        tracker
    }

    /// Tear down and forget a window.
    pub fn remove_window(&mut self, identity: &WindowIdentity) -> bool {
        let Some(entry) = self.entries.remove(identity) else {
            return false;
        };
        entry.tracker.teardown();
        self.groups.unregister(identity);
        self.transactions.unregister(entry.window.native_handle());
        true
    }

    /// Native stand-in for `identity`.
    #[must_use]
    pub fn window(&self, identity: &WindowIdentity) -> Option<&Arc<MemoryWindow>> {
        self.entries.get(identity).map(|e| &e.window)
    }

    /// Tracker for `identity`.
    #[must_use]
    pub fn tracker(&self, identity: &WindowIdentity) -> Option<&Arc<BoundsTracker>> {
        self.entries.get(identity).map(|e| &e.tracker)
    }

    /// Deliver a native event to `identity`. Returns false for unknown windows.
    pub fn dispatch(&self, identity: &WindowIdentity, event: &WindowEvent) -> bool {
        match self.window(identity) {
            Some(window) => {
                window.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Put `identity` into `group`.
    pub fn join(&self, group: &GroupId, identity: &WindowIdentity) {
        self.groups.join(group, identity);
    }

    /// Take `identity` out of its group.
    pub fn leave(&self, identity: &WindowIdentity) {
        self.groups.leave(identity);
    }

    /// Every notification emitted since the last drain, in emission order.
    pub fn drain_notifications(&self) -> Vec<BoundsChange> {
        self.notifications.try_iter().collect()
    }

    /// Leader tracker.
    #[must_use]
    pub fn leaders(&self) -> &GroupTransactions {
        &self.leaders
    }

    /// Animation state.
    #[must_use]
    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    /// Deferred-move relay.
    #[must_use]
    pub fn relay(&self) -> &RecordingRelay {
        &self.relay
    }

    /// Position transaction factory.
    #[must_use]
    pub fn transactions(&self) -> &MemoryTransactions {
        &self.transactions
    }

    /// Services handed to trackers.
    #[must_use]
    pub fn services(&self) -> &TrackerServices {
        &self.services
    }
}
