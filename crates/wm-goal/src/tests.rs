//! Unit tests for wm-goal.

use wm_core::{GoalId, ObjectId, PathId, TeamId, Tick, Vec3};
use wm_world::{DockBay, ObjectKind, ObjectState, WaypointPath, WorldSnapshot, WorldSnapshotBuilder};

use crate::{
    Goal, GoalError, GoalFlags, GoalKind, GoalOrder, GoalQueue, GoalSubject, InvalidReason,
    RejectReason,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CARRIER: ObjectId = ObjectId(9);
const BANDIT: ObjectId = ObjectId(20);
const PATROL: PathId = PathId(1);

/// A carrier with bay 0, one hostile fighter and one waypoint list.
fn world() -> WorldSnapshot {
    let mut b = WorldSnapshotBuilder::new(1, Tick(1));
    let mut carrier = ObjectState::new(CARRIER, ObjectKind::Capital, TeamId(0), Vec3::ZERO);
    carrier.dock_bays.push(DockBay { index: 0, offset: Vec3::new(0.0, -30.0, 0.0), outward: -Vec3::Y });
    b.add_object(carrier).unwrap();
    b.add_object(ObjectState::new(BANDIT, ObjectKind::Fighter, TeamId(1), Vec3::new(500.0, 0.0, 0.0)))
        .unwrap();
    b.add_path(WaypointPath::world(PATROL, vec![Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)])).unwrap();
    b.build()
}

fn exclusive(overridable: bool) -> GoalFlags {
    GoalFlags { exclusive: true, overridable, ..GoalFlags::default() }
}

fn subject() -> GoalSubject {
    GoalSubject::default()
}

// ── Admission ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod admission {
    use super::*;

    #[test]
    fn full_queue_rejects() {
        let mut q = GoalQueue::new(2);
        q.add_goal(Goal::new(GoalKind::AttackAny, 1)).unwrap();
        q.add_goal(Goal::new(GoalKind::StayStill, 1)).unwrap();
        let err = q.add_goal(Goal::new(GoalKind::AttackAny, 99)).unwrap_err();
        assert!(matches!(err, GoalError::Rejected { reason: RejectReason::QueueFull }));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn exclusive_blocker_rejects_equal_priority() {
        let mut q = GoalQueue::new(8);
        q.add_goal(Goal::new(GoalKind::Guard { target: CARRIER }, 50).with_flags(exclusive(false)))
            .unwrap();
        let err = q.add_goal(Goal::new(GoalKind::AttackAny, 50)).unwrap_err();
        assert!(matches!(err, GoalError::Rejected { reason: RejectReason::ExclusiveConflict }));
        // Higher priority non-exclusive goal coexists.
        q.add_goal(Goal::new(GoalKind::AttackAny, 51)).unwrap();
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn exclusive_supersedes_overridable() {
        let mut q = GoalQueue::new(8);
        let old = q
            .add_goal(Goal::new(GoalKind::Guard { target: CARRIER }, 80).with_flags(exclusive(true)))
            .unwrap();
        let new = q
            .add_goal(Goal::new(GoalKind::AttackAny, 10).with_flags(exclusive(false)))
            .unwrap();

        let gone = q.drain_superseded();
        assert_eq!(gone.len(), 1);
        assert_eq!(gone[0].id, old);
        assert!(q.get(old).is_none());
        assert!(q.get(new).is_some());
        assert!(q.drain_superseded().is_empty());
    }

    #[test]
    fn supersession_frees_its_slot() {
        let mut q = GoalQueue::new(1);
        q.add_goal(Goal::new(GoalKind::StayStill, 1).with_flags(exclusive(false))).unwrap();
        q.add_goal(Goal::new(GoalKind::AttackAny, 5).with_flags(exclusive(false))).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_superseded().len(), 1);
    }

    #[test]
    fn rejected_goal_leaves_queue_untouched() {
        let mut q = GoalQueue::new(8);
        q.add_goal(Goal::new(GoalKind::StayStill, 90).with_flags(exclusive(false))).unwrap();
        let before: Vec<GoalId> = q.iter().map(|e| e.id).collect();
        assert!(q.add_goal(Goal::new(GoalKind::AttackAny, 10).with_flags(exclusive(true))).is_err());
        let after: Vec<GoalId> = q.iter().map(|e| e.id).collect();
        assert_eq!(before, after);
        assert!(q.drain_superseded().is_empty());
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn equal_priority_first_inserted_wins() {
        let w = world();
        let mut q = GoalQueue::new(8);
        let a = q.add_goal(Goal::new(GoalKind::AttackAny, 10)).unwrap();
        let _b = q.add_goal(Goal::new(GoalKind::StayStill, 10)).unwrap();
        let sel = q.revalidate_and_select(&w, &subject());
        assert_eq!(sel.active, Some(a));
        assert!(sel.changed);
    }

    #[test]
    fn higher_priority_wins_and_changed_reported_once() {
        let w = world();
        let mut q = GoalQueue::new(8);
        q.add_goal(Goal::new(GoalKind::StayStill, 10)).unwrap();
        q.revalidate_and_select(&w, &subject());

        let hi = q.add_goal(Goal::new(GoalKind::AttackAny, 20)).unwrap();
        let sel = q.revalidate_and_select(&w, &subject());
        assert_eq!(sel.active, Some(hi));
        assert!(sel.changed);

        let again = q.revalidate_and_select(&w, &subject());
        assert_eq!(again.active, Some(hi));
        assert!(!again.changed);
    }

    #[test]
    fn must_complete_keeps_the_slot() {
        let w = world();
        let mut q = GoalQueue::new(8);
        let flags = GoalFlags { must_complete: true, ..GoalFlags::default() };
        let dock = q
            .add_goal(Goal::new(GoalKind::Dock { target: CARRIER, bay: 0 }, 10).with_flags(flags))
            .unwrap();
        q.revalidate_and_select(&w, &subject());

        q.add_goal(Goal::new(GoalKind::AttackAny, 99)).unwrap();
        let sel = q.revalidate_and_select(&w, &subject());
        assert_eq!(sel.active, Some(dock));
        assert!(!sel.changed);
    }

    #[test]
    fn dead_target_invalidated() {
        let w = world();
        let mut q = GoalQueue::new(8);
        let gone = q.add_goal(Goal::new(GoalKind::Attack { target: ObjectId(77) }, 50)).unwrap();
        let fallback = q.add_goal(Goal::new(GoalKind::StayStill, 1)).unwrap();
        let sel = q.revalidate_and_select(&w, &subject());

        assert_eq!(sel.active, Some(fallback));
        assert_eq!(sel.invalidated.len(), 1);
        assert_eq!(sel.invalidated[0].id, gone);
        assert_eq!(sel.invalidated[0].reason, InvalidReason::TargetGone);
        assert!(!sel.invalidated[0].was_active);
    }

    #[test]
    fn missing_bay_and_path_invalidated() {
        let w = world();
        let mut q = GoalQueue::new(8);
        q.add_goal(Goal::new(GoalKind::Dock { target: CARRIER, bay: 3 }, 5)).unwrap();
        q.add_goal(Goal::new(GoalKind::Waypoints { path: PathId(42), repeat: false }, 5)).unwrap();
        q.add_goal(Goal::new(GoalKind::Waypoints { path: PATROL, repeat: false }, 5)).unwrap();
        let sel = q.revalidate_and_select(&w, &subject());

        let reasons: Vec<InvalidReason> = sel.invalidated.iter().map(|i| i.reason).collect();
        assert_eq!(reasons, vec![InvalidReason::BayMissing, InvalidReason::PathMissing]);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn permissions() {
        let w = world();
        let mut q = GoalQueue::new(8);
        q.add_goal(Goal::new(GoalKind::Guard { target: CARRIER }, 5)).unwrap();
        q.add_goal(Goal::new(GoalKind::Attack { target: BANDIT }, 5)).unwrap();
        let sub_only = GoalFlags { subordinate_only: true, ..GoalFlags::default() };
        q.add_goal(Goal::new(GoalKind::StayStill, 5).with_flags(sub_only)).unwrap();
        let stay = q.add_goal(Goal::new(GoalKind::StayStill, 1)).unwrap();

        let mut s = GoalSubject { wing_leader: true, ..GoalSubject::default() };
        s.flags.engines_disabled = true;
        s.flags.weapons_disabled = true;
        let sel = q.revalidate_and_select(&w, &s);

        assert_eq!(sel.invalidated.len(), 3);
        assert!(sel.invalidated.iter().all(|i| i.reason == InvalidReason::NotPermitted));
        assert_eq!(sel.active, Some(stay));
    }

    #[test]
    fn removing_active_goal_reports_change() {
        let w = world();
        let mut q = GoalQueue::new(8);
        let a = q.add_goal(Goal::new(GoalKind::AttackAny, 10)).unwrap();
        let b = q.add_goal(Goal::new(GoalKind::StayStill, 1)).unwrap();
        q.revalidate_and_select(&w, &subject());

        assert!(q.complete(a).is_some());
        assert_eq!(q.active_id(), None);
        assert_eq!(q.reselect(), (Some(b), true));
    }

    #[test]
    fn removing_last_goal_still_reports_change() {
        let w = world();
        let mut q = GoalQueue::new(8);
        let a = q.add_goal(Goal::new(GoalKind::AttackAny, 10)).unwrap();
        q.revalidate_and_select(&w, &subject());

        q.remove_goal(a);
        let sel = q.revalidate_and_select(&w, &subject());
        assert_eq!(sel.active, None);
        assert!(sel.changed);
        assert!(!q.revalidate_and_select(&w, &subject()).changed);
    }

    #[test]
    fn object_removal_drops_referencing_goals() {
        let w = world();
        let mut q = GoalQueue::new(8);
        let a = q.add_goal(Goal::new(GoalKind::Attack { target: BANDIT }, 10)).unwrap();
        q.add_goal(Goal::new(GoalKind::Guard { target: CARRIER }, 1)).unwrap();
        q.revalidate_and_select(&w, &subject());

        let dropped = q.on_object_removed(BANDIT);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].id, a);
        assert!(dropped[0].was_active);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn empty_queue_selects_nothing() {
        let mut q = GoalQueue::new(4);
        let sel = q.revalidate_and_select(&world(), &subject());
        assert_eq!(sel.active, None);
        assert!(!sel.changed);
    }
}

// ── Inbox and schedule ────────────────────────────────────────────────────────

#[cfg(test)]
mod issuing {
    use super::*;
    use crate::{GoalInbox, GoalSchedule};

    #[test]
    fn inbox_clones_share_buffer() {
        let inbox = GoalInbox::new();
        let other = inbox.clone();
        other.submit(GoalOrder::new(ObjectId(1), Goal::new(GoalKind::StayStill, 1)));
        inbox.submit(GoalOrder::new(ObjectId(2), Goal::new(GoalKind::AttackAny, 1)));
        assert_eq!(inbox.len(), 2);

        let drained = inbox.drain();
        assert_eq!(drained[0].ship, ObjectId(1));
        assert_eq!(drained[1].ship, ObjectId(2));
        assert!(other.is_empty());
    }

    #[test]
    fn inbox_accepts_from_other_threads() {
        let inbox = GoalInbox::new();
        let handles: Vec<_> = (0..4u32)
            .map(|i| {
                let tx = inbox.clone();
                std::thread::spawn(move || {
                    tx.submit(GoalOrder::new(ObjectId(i), Goal::new(GoalKind::StayStill, 1)));
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(inbox.drain().len(), 4);
    }

    #[test]
    fn schedule_releases_due_in_tick_order() {
        let mut s = GoalSchedule::new();
        let order = |ship| GoalOrder::new(ObjectId(ship), Goal::new(GoalKind::StayStill, 1));
        s.push(Tick(10), order(3));
        s.push(Tick(2), order(1));
        s.push(Tick(2), order(2));
        s.push(Tick(50), order(4));

        assert!(s.release_due(Tick(1)).is_empty());
        let due: Vec<u32> = s.release_due(Tick(10)).iter().map(|o| o.ship.0).collect();
        assert_eq!(due, vec![1, 2, 3]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.next_tick(), Some(Tick(50)));
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;
    use crate::{load_orders_reader, GoalSource};

    const CSV: &str = "\
tick,ship,kind,target,bay,path,priority,source,flags
0,1,attack_any,,,,50,mission,
0,2,guard,9,,,40,,subordinate_only
200,1,dock,9,0,,90,player,exclusive|must_complete
5,3,waypoints,,,4,30,dynamic,repeat
";

    #[test]
    fn parses_all_rows() {
        let mut s = load_orders_reader(CSV.as_bytes()).unwrap();
        assert_eq!(s.len(), 4);

        let first = s.release_due(Tick(5));
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].goal.kind, GoalKind::AttackAny);
        assert!(first[1].goal.flags.subordinate_only);
        assert_eq!(first[2].goal.kind, GoalKind::Waypoints { path: PathId(4), repeat: true });
        assert_eq!(first[2].goal.source, GoalSource::DynamicEvent);

        let dock = s.release_due(Tick(200));
        assert_eq!(dock[0].goal.kind, GoalKind::Dock { target: ObjectId(9), bay: 0 });
        assert_eq!(dock[0].goal.source, GoalSource::PlayerOrder);
        assert!(dock[0].goal.flags.exclusive && dock[0].goal.flags.must_complete);
    }

    #[test]
    fn missing_target_is_a_parse_error() {
        let csv = "tick,ship,kind,target,bay,path,priority,source,flags\n0,1,attack,,,,5,,\n";
        assert!(matches!(load_orders_reader(csv.as_bytes()), Err(GoalError::Parse(_))));
    }

    #[test]
    fn unknown_kind_and_flag_rejected() {
        let kind = "tick,ship,kind,target,bay,path,priority,source,flags\n0,1,loiter,,,,5,,\n";
        let flag = "tick,ship,kind,target,bay,path,priority,source,flags\n0,1,stay_still,,,,5,,sticky\n";
        assert!(load_orders_reader(kind.as_bytes()).is_err());
        assert!(load_orders_reader(flag.as_bytes()).is_err());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The active goal is the highest-priority, earliest-inserted one, and
        /// selection gives the same answer when repeated.
        #[test]
        fn selection_is_priority_then_insertion(priorities in prop::collection::vec(-5i32..5, 1..8)) {
            let w = world();
            let mut q = GoalQueue::new(8);
            let ids: Vec<GoalId> = priorities
                .iter()
                .map(|&p| q.add_goal(Goal::new(GoalKind::StayStill, p)).unwrap())
                .collect();

            let best = priorities.iter().copied().max().unwrap();
            let expected = ids[priorities.iter().position(|&p| p == best).unwrap()];

            let sel = q.revalidate_and_select(&w, &subject());
            prop_assert_eq!(sel.active, Some(expected));
            let again = q.revalidate_and_select(&w, &subject());
            prop_assert_eq!(again.active, Some(expected));
            prop_assert!(!again.changed);
        }
    }
}
