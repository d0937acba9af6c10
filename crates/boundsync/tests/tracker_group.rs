use boundsync::{
    BoundsChange, BoundsEventType, ChangeType, GroupId, LeaderCause, LeaderTracker,
    NativeWindow, Reason, Rect, RepositionMode, SwpFlags, TrackerCfg, WindowEvent, WindowId,
    WindowIdentity, WindowPos, memory::MemoryHost,
};

struct Pair {
    host: MemoryHost,
    a: WindowIdentity,
    b: WindowIdentity,
    group: GroupId,
}

impl Pair {
    fn new(mode: RepositionMode) -> Self {
        let mut host = MemoryHost::new(TrackerCfg { reposition: mode });
        let a = WindowIdentity::new("app", "a");
        let b = WindowIdentity::new("app", "b");
        host.add_window(a.clone(), 1, 0x10, Rect::new(0, 0, 100, 100));
        host.add_window(b.clone(), 2, 0x20, Rect::new(200, 0, 100, 100));
        let group = GroupId::new("g");
        host.join(&group, &a);
        host.join(&group, &b);
        Self { host, a, b, group }
    }

    fn bounds(&self, who: &WindowIdentity) -> Rect {
        self.host.window(who).expect("window").bounds()
    }

    fn emitted(&self, who: &WindowIdentity) -> Vec<BoundsChange> {
        self.host.window(who).expect("window").take_emitted()
    }

    /// Drag `a` by `steps` x offsets with begin/end user bounds change.
    fn drag_a(&self, steps: &[i32]) {
        let win = self.host.window(&self.a).expect("window");
        self.host.dispatch(&self.a, &WindowEvent::BeginUserBoundsChange);
        for x in steps {
            win.set_rect(Rect::new(*x, 0, 100, 100));
            self.host.dispatch(&self.a, &WindowEvent::BoundsChanged);
        }
        self.host.dispatch(&self.a, &WindowEvent::EndUserBoundsChange);
    }
}

fn settles(events: &[BoundsChange]) -> Vec<&BoundsChange> {
    events.iter().filter(|e| e.is_settle()).collect()
}

#[test]
fn user_drag_moves_follower_sequentially() {
    let pair = Pair::new(RepositionMode::Sequential);
    pair.drag_a(&[50]);

    assert_eq!(pair.bounds(&pair.b), Rect::new(250, 0, 100, 100));
    assert_eq!(pair.host.window(&pair.b).expect("window").raise_count(), 1);
    assert_eq!(pair.host.window(&pair.a).expect("window").raise_count(), 0);
    assert!(pair.host.leaders().leader(&pair.group).is_none());
    assert_eq!(pair.host.leaders().active_groups(), 0);

    let a_events = pair.emitted(&pair.a);
    let a_settles = settles(&a_events);
    assert_eq!(a_settles.len(), 1);
    assert_eq!(a_settles[0].change_type, ChangeType::Position);
    assert_eq!(a_settles[0].reason, Reason::Own);
    assert_eq!(a_settles[0].left, 50);

    // The follower settles through the end-of-transaction broadcast only.
    let b_events = pair.emitted(&pair.b);
    assert!(!b_events.is_empty());
    assert!(b_events.iter().all(|e| e.reason == Reason::Group));
    let b_settles = settles(&b_events);
    assert_eq!(b_settles.len(), 1);
    assert_eq!(b_settles[0].left, 250);
    assert_eq!(b_settles[0].change_type, ChangeType::Position);
}

#[test]
fn follower_settles_before_leader() {
    let pair = Pair::new(RepositionMode::Sequential);
    pair.drag_a(&[10, 20]);

    let order: Vec<(String, BoundsEventType)> = pair
        .host
        .drain_notifications()
        .into_iter()
        .map(|e| (e.name, e.event_type))
        .collect();
    assert_eq!(
        order,
        vec![
            ("a".to_string(), BoundsEventType::Changing),
            ("a".to_string(), BoundsEventType::Changing),
            ("b".to_string(), BoundsEventType::Changed),
            ("a".to_string(), BoundsEventType::Changed),
        ]
    );
    assert_eq!(pair.bounds(&pair.b), Rect::new(220, 0, 100, 100));
}

#[test]
fn leader_is_elected_once_per_gesture() {
    let pair = Pair::new(RepositionMode::Sequential);
    let win = pair.host.window(&pair.a).expect("window");
    pair.host
        .dispatch(&pair.a, &WindowEvent::BeginUserBoundsChange);
    win.set_rect(Rect::new(5, 0, 100, 100));
    pair.host.dispatch(&pair.a, &WindowEvent::BoundsChanged);

    let leader = pair.host.leaders().leader(&pair.group).expect("leader");
    assert_eq!(leader.window, pair.a);
    assert_eq!(leader.cause, LeaderCause::User);

    // A change reported by the follower mid-gesture does not steal leadership.
    let tracker_b = pair.host.tracker(&pair.b).expect("tracker");
    tracker_b.handle_bounds_change(true, false);
    let leader = pair.host.leaders().leader(&pair.group).expect("leader");
    assert_eq!(leader.window, pair.a);

    pair.host.dispatch(&pair.a, &WindowEvent::EndUserBoundsChange);
    assert!(pair.host.leaders().leader(&pair.group).is_none());
}

#[test]
fn batched_move_commits_one_transaction_and_relays_on_flush() {
    let pair = Pair::new(RepositionMode::Batched);
    pair.drag_a(&[50]);

    assert_eq!(pair.bounds(&pair.b), Rect::new(250, 0, 100, 100));
    let tx = pair.host.transactions();
    assert_eq!(tx.commit_count(), 1);
    assert_eq!(tx.pending_count(), 1);
    assert!(pair.host.relay().moves().is_empty());

    assert_eq!(tx.flush(), 1);
    assert_eq!(
        pair.host.relay().moves(),
        vec![(
            WindowId::new(2),
            WindowPos {
                x: 250,
                y: 0,
                flags: SwpFlags::GROUP_MOVE,
            }
        )]
    );
    assert_eq!(pair.host.window(&pair.b).expect("window").set_bounds_count(), 1);
}

#[test]
fn api_move_settles_every_member_individually() {
    let pair = Pair::new(RepositionMode::Sequential);
    let b_win = pair.host.window(&pair.b).expect("window");
    b_win.set_notify_on_set_bounds(true);

    let a_win = pair.host.window(&pair.a).expect("window");
    a_win.set_rect(Rect::new(30, 10, 100, 100));
    pair.host.dispatch(&pair.a, &WindowEvent::BoundsChanged);

    assert_eq!(pair.bounds(&pair.b), Rect::new(230, 10, 100, 100));
    assert!(pair.host.leaders().leader(&pair.group).is_none());

    let a_events = pair.emitted(&pair.a);
    assert_eq!(a_events.len(), 2);
    assert!(a_events.iter().all(|e| e.reason == Reason::Own));

    let b_events = pair.emitted(&pair.b);
    assert_eq!(b_events.len(), 2, "got {b_events:?}");
    assert_eq!(b_events[0].event_type, BoundsEventType::Changing);
    assert_eq!(b_events[1].event_type, BoundsEventType::Changed);
    assert!(b_events.iter().all(|e| e.reason == Reason::Group));
    assert_eq!(b_events[1].left, 230);
}

#[test]
fn animated_leader_tags_group_animation() {
    let pair = Pair::new(RepositionMode::Sequential);
    pair.host.animations().start(WindowId::new(1));

    let a_win = pair.host.window(&pair.a).expect("window");
    a_win.set_rect(Rect::new(0, 40, 100, 100));
    pair.host.dispatch(&pair.a, &WindowEvent::BoundsChanged);
    let leader = pair.host.leaders().leader(&pair.group).expect("leader");
    assert_eq!(leader.cause, LeaderCause::Animation);

    pair.host
        .dispatch(&pair.a, &WindowEvent::AnimateEnd { bounds: true });
    pair.host.animations().finish(WindowId::new(1));

    let a_events = pair.emitted(&pair.a);
    assert!(a_events.iter().all(|e| e.reason == Reason::Animation));
    let b_events = pair.emitted(&pair.b);
    assert_eq!(b_events.len(), 1);
    assert_eq!(b_events[0].reason, Reason::GroupAnimation);
    assert_eq!(b_events[0].top, 40);
}

#[test]
fn follower_move_failure_is_tolerated() {
    let pair = Pair::new(RepositionMode::Sequential);
    pair.host
        .window(&pair.b)
        .expect("window")
        .set_fail_set_bounds(true);
    pair.drag_a(&[50]);

    assert_eq!(pair.bounds(&pair.b), Rect::new(200, 0, 100, 100));
    assert!(pair.host.leaders().leader(&pair.group).is_none());
    let a_events = pair.emitted(&pair.a);
    assert_eq!(settles(&a_events).len(), 1);
}

#[test]
fn lone_group_member_moves_nothing() {
    let mut host = MemoryHost::new(TrackerCfg {
        reposition: RepositionMode::Batched,
    });
    let a = WindowIdentity::new("app", "solo");
    host.add_window(a.clone(), 1, 0x10, Rect::new(0, 0, 100, 100));
    let group = GroupId::new("g");
    host.join(&group, &a);

    let win = host.window(&a).expect("window").clone();
    host.dispatch(&a, &WindowEvent::BeginUserBoundsChange);
    win.set_rect(Rect::new(70, 0, 100, 100));
    host.dispatch(&a, &WindowEvent::BoundsChanged);
    host.dispatch(&a, &WindowEvent::EndUserBoundsChange);

    assert_eq!(host.transactions().commit_count(), 0);
    assert!(host.leaders().leader(&group).is_none());
    assert_eq!(settles(&win.take_emitted()).len(), 1);
}

#[test]
fn leaving_the_group_stops_following() {
    let pair = Pair::new(RepositionMode::Sequential);
    pair.host.leave(&pair.b);
    pair.drag_a(&[50]);
    assert_eq!(pair.bounds(&pair.b), Rect::new(200, 0, 100, 100));
    assert!(pair.emitted(&pair.b).is_empty());
}

#[test]
fn follower_at_coordinate_limit_is_clamped() {
    let mut host = MemoryHost::new(TrackerCfg {
        reposition: RepositionMode::Sequential,
    });
    let a = WindowIdentity::new("app", "a");
    let b = WindowIdentity::new("app", "b");
    host.add_window(a.clone(), 1, 0x10, Rect::new(0, 0, 10, 10));
    host.add_window(b.clone(), 2, 0x20, Rect::new(i32::MAX - 5, 0, 10, 10));
    let group = GroupId::new("g");
    host.join(&group, &a);
    host.join(&group, &b);

    let a_win = host.window(&a).expect("window");
    a_win.set_rect(Rect::new(100, 0, 10, 10));
    host.dispatch(&a, &WindowEvent::BoundsChanged);

    let b_bounds = host.window(&b).expect("window").bounds();
    assert_eq!(b_bounds, Rect::new(i32::MAX, 0, 10, 10));
    assert!(host.leaders().leader(&group).is_none());
}
