//! Causal classification of bounds changes.
use boundsync_ids::{GroupId, WindowId, WindowIdentity};

use crate::{
    native::{AnimationState, GroupRegistry},
    payload::Reason,
    transaction::LeaderTracker,
};

/// Decides the [`Reason`] tag for a window's bounds change.
pub struct ReasonClassifier<'a> {
    /// Group leader records.
    pub leaders: &'a dyn LeaderTracker,
    /// Window lookup for the leader's native id.
    pub groups: &'a dyn GroupRegistry,
    /// Animation state.
    pub animations: &'a dyn AnimationState,
}

impl ReasonClassifier<'_> {
    /// Classify a change to `window` (host id `id`) in `group`.
    ///
    /// With a recorded group leader the leader's animation state decides
    /// between the animation and plain variants, and leadership decides
    /// between the own and group variants. Without a group or leader only
    /// this window's animation state matters.
    #[must_use]
    pub fn classify(
        &self,
        window: &WindowIdentity,
        id: WindowId,
        group: Option<&GroupId>,
    ) -> Reason {
        if let Some(leader) = group.and_then(|g| self.leaders.leader(g)) {
            let leader_animating = self
                .groups
                .window(&leader.window)
                .is_some_and(|w| self.animations.is_animating(w.id()));
            let is_leader = leader.window == *window;
            return match (leader_animating, is_leader) {
                (true, true) => Reason::Animation,
                (true, false) => Reason::GroupAnimation,
                (false, true) => Reason::Own,
                (false, false) => Reason::Group,
            };
        }

        if self.animations.is_animating(id) {
            Reason::Animation
        } else {
            Reason::Own
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        bounds::Rect,
        memory::{AnimationSet, MemoryWindow, WindowGroups},
        transaction::{GroupTransactions, LeaderCause},
    };

    struct Fixture {
        leaders: GroupTransactions,
        groups: WindowGroups,
        animations: AnimationSet,
        a: WindowIdentity,
        b: WindowIdentity,
        group: GroupId,
    }

    impl Fixture {
        fn new() -> Self {
            let groups = WindowGroups::new();
            let a = WindowIdentity::new("app", "a");
            let b = WindowIdentity::new("app", "b");
            let group = GroupId::new("g");
            let rect = Rect::new(0, 0, 10, 10);
            groups.register(a.clone(), Arc::new(MemoryWindow::new(1, 0x10, rect)));
            groups.register(b.clone(), Arc::new(MemoryWindow::new(2, 0x20, rect)));
            groups.join(&group, &a);
            groups.join(&group, &b);
            Self {
                leaders: GroupTransactions::new(),
                groups,
                animations: AnimationSet::new(),
                a,
                b,
                group,
            }
        }

        fn classify(&self, window: &WindowIdentity, id: u32, group: Option<&GroupId>) -> Reason {
            ReasonClassifier {
                leaders: &self.leaders,
                groups: &self.groups,
                animations: &self.animations,
            }
            .classify(window, WindowId::new(id), group)
        }
    }

    #[test]
    fn ungrouped_uses_own_animation_state() {
        let f = Fixture::new();
        assert_eq!(f.classify(&f.a, 1, None), Reason::Own);
        f.animations.start(WindowId::new(1));
        assert_eq!(f.classify(&f.a, 1, None), Reason::Animation);
    }

    #[test]
    fn group_without_leader_falls_back() {
        let f = Fixture::new();
        f.animations.start(WindowId::new(2));
        assert_eq!(f.classify(&f.b, 2, Some(&f.group)), Reason::Animation);
        assert_eq!(f.classify(&f.a, 1, Some(&f.group)), Reason::Own);
    }

    #[test]
    fn group_with_leader() {
        let f = Fixture::new();
        f.leaders.set_leader(&f.group, &f.a, LeaderCause::User);
        assert_eq!(f.classify(&f.a, 1, Some(&f.group)), Reason::Own);
        assert_eq!(f.classify(&f.b, 2, Some(&f.group)), Reason::Group);

        f.animations.start(WindowId::new(1));
        assert_eq!(f.classify(&f.a, 1, Some(&f.group)), Reason::Animation);
        assert_eq!(f.classify(&f.b, 2, Some(&f.group)), Reason::GroupAnimation);
    }

    #[test]
    fn follower_animation_is_ignored_under_a_leader() {
        let f = Fixture::new();
        f.leaders.set_leader(&f.group, &f.a, LeaderCause::Api);
        f.animations.start(WindowId::new(2));
        assert_eq!(f.classify(&f.b, 2, Some(&f.group)), Reason::Group);
    }
}
