//! The bounds-changed state tracker.
//!
//! One [`BoundsTracker`] is attached to each window. It listens to the
//! window's native lifecycle and geometry events, turns bursts of raw
//! geometry signals into `bounds-changing` / `bounds-changed` notifications
//! tagged with a [`Reason`] and a [`ChangeType`], and, when the window is in
//! a group, drives the group move:
//!
//! - The first member to report an intermediate change becomes the group
//!   leader, with a cause of `user`, `animation` or `api`.
//! - Every leader change is applied as a position delta to all other
//!   members through the configured [`crate::Repositioner`].
//! - The leader's settle ends the transaction. For user and animation moves
//!   the end is broadcast so followers settle too; API moves already settle
//!   every member individually.
//!
//! While the window is hidden, minimized or maximized its notifications are
//! withheld and replayed in collapsed form when it becomes interactive again.
//!
//! All handlers run to completion on the caller's thread. The tracker's own
//! lock is never held while calling into collaborators, so the synchronous
//! end-of-transaction broadcast may re-enter other trackers freely.
use std::sync::{Arc, Weak};

use boundsync_ids::{GroupId, WindowIdentity};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    bounds::{Bounds, BoundsComparator, PositionDelta, WindowState},
    deferred::DeferredQueue,
    listeners::ListenerId,
    native::{
        AnimationState, DeferredMoveRelay, GroupMember, GroupRegistry, NativeWindow, WindowEvent,
        WindowListener,
    },
    payload::{BoundsChange, BoundsEventType, ChangeType, Reason},
    reason::ReasonClassifier,
    reposition::{MemberMove, Repositioner},
    transaction::{LeaderCause, LeaderTracker, TransactionListener},
};

/// Collaborators shared by every tracker of a host.
#[derive(Clone)]
pub struct TrackerServices {
    /// Group leader records and the end-of-transaction broadcast.
    pub leaders: Arc<dyn LeaderTracker>,
    /// Group membership and window lookup.
    pub groups: Arc<dyn GroupRegistry>,
    /// Animation state.
    pub animations: Arc<dyn AnimationState>,
    /// Receiver of asynchronously confirmed window positions.
    pub relay: Arc<dyn DeferredMoveRelay>,
    /// Strategy used to move followers.
    pub repositioner: Arc<dyn Repositioner>,
}

/// Mutable per-window state.
#[derive(Debug, Default)]
struct TrackerState {
    /// Last committed snapshot.
    cached: Bounds,
    /// Between begin- and end-user-bounds-change.
    user_change_active: bool,
    /// Diffs snapshots and accumulates changes since the last settle.
    comparator: BoundsComparator,
    /// Withheld notifications.
    deferred: DeferredQueue,
}

/// Registrations released on teardown.
#[derive(Clone, Copy, Debug)]
struct Subscriptions {
    /// Registration on the native window.
    window: ListenerId,
    /// Registration for end-of-transaction broadcasts.
    leaders: ListenerId,
}

/// Tracks the bounds of one window.
pub struct BoundsTracker {
    /// Window being tracked.
    identity: WindowIdentity,
    /// Native window handle.
    window: Arc<dyn NativeWindow>,
    /// Injected collaborators.
    services: TrackerServices,
    /// Mutable state.
    state: Mutex<TrackerState>,
    /// Live registrations; `None` after teardown.
    subscriptions: Mutex<Option<Subscriptions>>,
}

impl BoundsTracker {
    /// Snapshot `window`, subscribe to its events and to group transaction
    /// broadcasts, and return the tracker.
    pub fn attach(
        identity: WindowIdentity,
        window: Arc<dyn NativeWindow>,
        services: TrackerServices,
    ) -> Arc<Self> {
        let cached = Bounds::capture(window.as_ref());
        let tracker = Arc::new(Self {
            identity,
            window,
            services,
            state: Mutex::new(TrackerState {
                cached,
                ..TrackerState::default()
            }),
            subscriptions: Mutex::new(None),
        });

        let weak: Weak<Self> = Arc::downgrade(&tracker);
        let window_listener: Weak<dyn WindowListener> = weak.clone();
        let transaction_listener: Weak<dyn TransactionListener> = weak;
        let subs = Subscriptions {
            window: tracker.window.subscribe(window_listener),
            leaders: tracker.services.leaders.subscribe(transaction_listener),
        };
        *tracker.subscriptions.lock() = Some(subs);

        debug!(window = %tracker.identity, bounds = %cached.rect, "bounds tracker attached");
        tracker
    }

    /// Identity of the tracked window.
    #[must_use]
    pub fn identity(&self) -> &WindowIdentity {
        &self.identity
    }

    /// Last committed snapshot.
    #[must_use]
    pub fn cached_bounds(&self) -> Bounds {
        self.state.lock().cached
    }

    /// True while notifications are withheld.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        self.state.lock().deferred.is_active()
    }

    /// Number of withheld notifications.
    #[must_use]
    pub fn deferred_len(&self) -> usize {
        self.state.lock().deferred.len()
    }

    /// True between begin- and end-user-bounds-change.
    #[must_use]
    pub fn is_user_bounds_change_active(&self) -> bool {
        self.state.lock().user_change_active
    }

    /// True once [`Self::teardown`] ran.
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.subscriptions.lock().is_none()
    }

    /// Release every event registration. Idempotent.
    pub fn teardown(&self) {
        let Some(subs) = self.subscriptions.lock().take() else {
            return;
        };
        self.window.unsubscribe(subs.window);
        self.services.leaders.unsubscribe(subs.leaders);
        debug!(window = %self.identity, "bounds tracker detached");
    }

    /// Classify the window's current geometry against the cached snapshot.
    ///
    /// `additional_change_expected` marks an intermediate event of a gesture;
    /// otherwise this is the settle. `force` dispatches even without a
    /// geometric change. Returns whether a notification was emitted or
    /// queued. The cache is always updated, and a settle resets the
    /// accumulated change flags.
    pub fn handle_bounds_change(&self, additional_change_expected: bool, force: bool) -> bool {
        let current = Bounds::capture(self.window.as_ref());
        let (cached, diff, size_acc, position_acc, user_active) = {
            let mut st = self.state.lock();
            let cached = st.cached;
            let diff = st.comparator.compare(&current, &cached);
            (
                cached,
                diff,
                st.comparator.size_changed_since_settle(),
                st.comparator.position_changed_since_settle(),
                st.user_change_active,
            )
        };

        let state_min_max = diff.state && current.state != WindowState::Normal;
        let event_type = if additional_change_expected {
            BoundsEventType::Changing
        } else {
            BoundsEventType::Changed
        };

        let mut size_change = diff.size();
        let mut position_change = diff.position();
        if event_type == BoundsEventType::Changed {
            size_change |= size_acc;
            position_change |= position_acc;
        }

        let dispatch = (diff.changed && !state_min_max) || force;
        if dispatch {
            let change_type = ChangeType::from_flags(size_change, position_change);
            let group = self.group();
            let reason = self.classify(group.as_ref());
            trace!(
                window = %self.identity,
                ?event_type,
                ?change_type,
                %reason,
                force,
                "bounds change"
            );

            if let Some(group) = &group {
                self.coordinate_group(group, force, user_active, &current, &cached);
            }

            let emit = {
                let mut st = self.state.lock();
                let deferred = st.deferred.is_active();
                let change = BoundsChange::new(
                    &self.identity,
                    current.rect,
                    change_type,
                    reason,
                    event_type,
                    deferred,
                );
                if deferred {
                    st.deferred.push(change);
                    None
                } else {
                    Some(change)
                }
            };
            if let Some(change) = emit {
                self.window.emit_bounds_change(&change);
            }
        }

        let mut st = self.state.lock();
        st.cached = current;
        if !additional_change_expected {
            st.comparator.reset();
        }
        dispatch
    }

    /// Forced settle.
    fn settle(&self) -> bool {
        self.handle_bounds_change(false, true)
    }

    /// Current group of the window.
    fn group(&self) -> Option<GroupId> {
        self.services.groups.group_of(&self.identity)
    }

    /// Whether this window is mid-animation.
    fn is_animating(&self) -> bool {
        self.services.animations.is_animating(self.window.id())
    }

    /// Reason tag for a change happening now.
    fn classify(&self, group: Option<&GroupId>) -> Reason {
        ReasonClassifier {
            leaders: self.services.leaders.as_ref(),
            groups: self.services.groups.as_ref(),
            animations: self.services.animations.as_ref(),
        }
        .classify(&self.identity, self.window.id(), group)
    }

    /// True when this window currently leads `group`.
    fn is_leader_of(&self, group: &GroupId) -> bool {
        self.services
            .leaders
            .leader(group)
            .is_some_and(|leader| leader.window == self.identity)
    }

    /// Leader election, transaction end and follower moves for one change.
    fn coordinate_group(
        &self,
        group: &GroupId,
        force: bool,
        user_active: bool,
        current: &Bounds,
        cached: &Bounds,
    ) {
        let leaders = &self.services.leaders;
        if force {
            if let Some(leader) = leaders.leader(group)
                && leader.window == self.identity
            {
                // API moves settle every member on their own.
                if leader.cause != LeaderCause::Api {
                    leaders.notify_end_transaction(group);
                }
                leaders.clear_group(group);
            }
        } else if leaders.leader(group).is_none() {
            let cause = if user_active {
                LeaderCause::User
            } else if self.is_animating() {
                LeaderCause::Animation
            } else {
                LeaderCause::Api
            };
            leaders.set_leader(group, &self.identity, cause);
        }

        if self.is_leader_of(group) {
            self.move_followers(group, PositionDelta::between(current, cached));
        }
    }

    /// Shift every other member of `group` by `delta`.
    fn move_followers(&self, group: &GroupId, delta: PositionDelta) {
        let followers: Vec<GroupMember> = self
            .services
            .groups
            .members(group)
            .into_iter()
            .filter(|m| m.identity != self.identity)
            .collect();
        if followers.is_empty() {
            return;
        }

        for m in &followers {
            if let Err(err) = m.window.bring_to_front() {
                warn!(window = %m.identity, %err, "raising group member failed");
            }
        }

        let moves: Vec<MemberMove> = followers
            .into_iter()
            .map(|m| {
                let target = m.window.bounds().translated(delta);
                MemberMove {
                    identity: m.identity,
                    window: m.window,
                    target,
                }
            })
            .collect();

        debug!(
            group = %group,
            leader = %self.identity,
            %delta,
            followers = moves.len(),
            mode = %self.services.repositioner.mode(),
            "moving group"
        );
        self.services.repositioner.apply(&moves);
    }

    /// Stop deferring and emit the collapsed replay.
    fn resume_deferred(&self) {
        let replay = self.state.lock().deferred.resume();
        if !replay.is_empty() {
            debug!(window = %self.identity, events = replay.len(), "replaying deferred bounds changes");
        }
        for change in &replay {
            self.window.emit_bounds_change(change);
        }
    }

    /// Start deferring and freeze the current geometry as the baseline.
    fn defer_and_snapshot(&self) {
        let current = Bounds::capture(self.window.as_ref());
        let mut st = self.state.lock();
        st.deferred.defer();
        st.cached = current;
    }

    /// Snapshot the current geometry, stop deferring and replay.
    fn snapshot_and_resume(&self) {
        let current = Bounds::capture(self.window.as_ref());
        self.state.lock().cached = current;
        self.resume_deferred();
    }

    /// Handle the ambiguous native "bounds changed" signal.
    fn on_native_bounds_changed(&self) {
        let group = self.group();
        if !self.handle_bounds_change(true, false) {
            return;
        }
        let settle = match &group {
            Some(group) => self
                .services
                .leaders
                .leader(group)
                .is_some_and(|leader| leader.cause == LeaderCause::Api),
            None => !self.is_animating() && !self.is_user_bounds_change_active(),
        };
        if settle {
            self.settle();
        }
    }
}

impl WindowListener for BoundsTracker {
    fn on_window_event(&self, event: &WindowEvent) {
        trace!(window = %self.identity, event = event.name(), "window event");
        match event {
            WindowEvent::BeginUserBoundsChange => {
                self.state.lock().user_change_active = true;
            }
            WindowEvent::EndUserBoundsChange => {
                self.state.lock().user_change_active = false;
                self.settle();
            }
            WindowEvent::BoundsChanged => self.on_native_bounds_changed(),
            WindowEvent::AnimateEnd { bounds } => {
                if *bounds {
                    self.settle();
                }
            }
            WindowEvent::VisibilityChanged { visible } => {
                if !*visible || self.window.is_minimized() || self.window.is_maximized() {
                    self.state.lock().deferred.defer();
                } else {
                    self.resume_deferred();
                }
            }
            WindowEvent::Minimize | WindowEvent::Maximize => self.defer_and_snapshot(),
            WindowEvent::Restore | WindowEvent::Unmaximize => self.snapshot_and_resume(),
            WindowEvent::DeferredSetBounds(pos) => {
                self.services.relay.handle_move(self.window.id(), *pos);
            }
        }
    }
}

impl TransactionListener for BoundsTracker {
    fn on_transaction_end(&self, group: &GroupId) {
        if self.group().as_ref() != Some(group) {
            return;
        }
        if !self.is_leader_of(group) {
            self.settle();
        }
    }
}

impl Drop for BoundsTracker {
    fn drop(&mut self) {
        self.teardown();
    }
}
