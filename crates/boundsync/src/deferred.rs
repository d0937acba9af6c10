//! Buffering of notifications while a window is hidden, minimized or maximized.
//!
//! Queued notifications are replayed in collapsed form once the window is
//! interactive again: intermediate `bounds-changing` entries are dropped,
//! adjacent settle entries with the same reason merge into one run, and each
//! run is replayed as a `bounds-changing` / `bounds-changed` pair built from
//! the run's last entry.
use crate::payload::{BoundsChange, BoundsEventType, ChangeType};

/// Deferral flag plus the notifications withheld while it is set.
///
/// The queue is only ever non-empty while deferral is active; [`Self::resume`]
/// clears it.
#[derive(Clone, Debug, Default)]
pub struct DeferredQueue {
    /// Notifications are being withheld.
    active: bool,
    /// Withheld notifications in arrival order.
    events: Vec<BoundsChange>,
}

impl DeferredQueue {
    /// True while notifications are withheld.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start withholding notifications.
    pub fn defer(&mut self) {
        self.active = true;
    }

    /// Queue a notification. Callers only push while deferral is active.
    pub fn push(&mut self, change: BoundsChange) {
        debug_assert!(self.active, "push while not deferred");
        self.events.push(change);
    }

    /// Number of withheld notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is withheld.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stop withholding and return the collapsed replay, in emission order.
    pub fn resume(&mut self) -> Vec<BoundsChange> {
        self.active = false;
        let events = std::mem::take(&mut self.events);
        coalesce(events)
    }
}

/// Collapse queued notifications into their replay sequence.
#[must_use]
pub fn coalesce(events: Vec<BoundsChange>) -> Vec<BoundsChange> {
    let mut runs: Vec<Vec<BoundsChange>> = Vec::new();
    for event in events.into_iter().filter(BoundsChange::is_settle) {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|prev| prev.reason == event.reason) => {
                run.push(event);
            }
            _ => runs.push(vec![event]),
        }
    }

    let mut replay = Vec::with_capacity(runs.len() * 2);
    for run in runs {
        let size = run.iter().any(|e| e.change_type.has_size());
        let position = run.iter().any(|e| e.change_type.has_position());
        let Some(mut last) = run.into_iter().last() else {
            continue;
        };
        last.change_type = ChangeType::from_flags(size, position);

        let mut changing = last.clone();
        changing.event_type = BoundsEventType::Changing;
        last.event_type = BoundsEventType::Changed;
        replay.push(changing);
        replay.push(last);
    }
    replay
}
