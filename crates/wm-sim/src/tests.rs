//! Integration tests for wm-sim.

use wm_agent::{AgentSpec, AgentStoreBuilder, Loadout, Mode, WeaponBank};
use wm_core::{AgentId, ObjectId, ProfileStore, SimConfig, SkillLevel, SkillProfile, TeamId, Tick, Vec3};
use wm_decision::{AgentEvent, StandardBrain};
use wm_goal::{Goal, GoalKind, GoalOrder, GoalSchedule};
use wm_world::{ObjectKind, ObjectState, WorldSnapshot, WorldSnapshotBuilder};

use crate::{NoopObserver, RecordingSink, Sim, SimBuilder, SimError, SimObserver, StaticWorld};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_duration_ms:      100,
        total_ticks,
        seed:                  7,
        num_threads:           Some(1),
        output_interval_ticks: 1,
        goal_capacity:         4,
    }
}

fn profile() -> SkillProfile {
    SkillProfile {
        accuracy: 1.0,
        circle_strafe_percent: 0.0,
        glide_attack_percent: 0.0,
        ..SkillProfile::baseline()
    }
}

fn spec(ship: u32) -> AgentSpec {
    AgentSpec::new(ObjectId(ship), TeamId(0), SkillLevel::MEDIUM)
        .with_loadout(Loadout { primary: vec![WeaponBank::gun(800.0, 0.25)], ..Loadout::default() })
}

/// Agents for ships 1..=n.
fn sim_with(n: u32, profile: SkillProfile, config: SimConfig) -> Sim<StandardBrain> {
    let mut b = AgentStoreBuilder::new(ProfileStore::uniform(profile).unwrap(), config.seed)
        .goal_capacity(config.goal_capacity);
    for ship in 1..=n {
        b = b.spawn(spec(ship));
    }
    let (store, rngs) = b.build().unwrap();
    SimBuilder::new(config, store, rngs, StandardBrain).build().unwrap()
}

fn fighter(id: u32, team: u8, pos: Vec3) -> ObjectState {
    let mut s = ObjectState::new(ObjectId(id), ObjectKind::Fighter, TeamId(team), pos);
    s.max_speed = 100.0;
    s
}

/// Ships 1–3 on team 0 in a column; hostiles 10 and 11 on team 1.
fn arena_objects() -> Vec<ObjectState> {
    vec![
        fighter(1, 0, Vec3::new(0.0, 0.0, 0.0)),
        fighter(2, 0, Vec3::new(0.0, 100.0, 0.0)),
        fighter(3, 0, Vec3::new(0.0, 200.0, 0.0)),
        fighter(10, 1, Vec3::new(500.0, 0.0, 0.0)),
        fighter(11, 1, Vec3::new(500.0, 200.0, 0.0)),
    ]
}

fn snapshot(objects: Vec<ObjectState>, removed: &[u32]) -> WorldSnapshot {
    let mut b = WorldSnapshotBuilder::new(0, Tick::ZERO);
    for o in objects {
        b.add_object(o).unwrap();
    }
    for &id in removed {
        b.mark_removed(ObjectId(id));
    }
    b.build()
}

fn arena() -> StaticWorld {
    StaticWorld::new(snapshot(arena_objects(), &[]))
}

#[derive(Default)]
struct Log {
    starts:    usize,
    ends:      usize,
    acted:     Vec<usize>,
    events:    Vec<AgentEvent>,
    snapshots: Vec<Tick>,
    finished:  Option<Tick>,
}

impl Log {
    fn kinds(&self, name: &str) -> Vec<&AgentEvent> {
        self.events.iter().filter(|e| e.kind.name() == name).collect()
    }
}

impl SimObserver for Log {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }
    fn on_events(&mut self, _tick: Tick, events: &[AgentEvent]) {
        self.events.extend_from_slice(events);
    }
    fn on_tick_end(&mut self, _tick: Tick, acted: usize) {
        self.ends += 1;
        self.acted.push(acted);
    }
    fn on_snapshot(&mut self, tick: Tick, _agents: &[wm_agent::AgentTelemetry]) {
        self.snapshots.push(tick);
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.finished = Some(final_tick);
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_successfully_with_defaults() {
        let sim = sim_with(3, profile(), test_config(10));
        assert_eq!(sim.agents.len(), 3);
        assert_eq!(sim.rngs.len(), 3);
        assert_eq!(sim.now(), Tick::ZERO);
    }

    #[test]
    fn invalid_config_errors() {
        let (store, rngs) = AgentStoreBuilder::new(ProfileStore::uniform(profile()).unwrap(), 1)
            .spawn(spec(1))
            .build()
            .unwrap();
        let config = SimConfig { tick_duration_ms: 0, ..test_config(10) };
        let result = SimBuilder::new(config, store, rngs, StandardBrain).build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn rng_count_mismatch_errors() {
        let profiles = || ProfileStore::uniform(profile()).unwrap();
        let (_, two_rngs) = AgentStoreBuilder::new(profiles(), 1).spawn(spec(1)).spawn(spec(2)).build().unwrap();
        let (three, _) = AgentStoreBuilder::new(profiles(), 1)
            .spawn(spec(1))
            .spawn(spec(2))
            .spawn(spec(3))
            .build()
            .unwrap();
        let result = SimBuilder::new(test_config(10), three, two_rngs, StandardBrain).build();
        assert!(matches!(result, Err(SimError::AgentCountMismatch { expected: 3, got: 2, .. })));
    }

    #[test]
    fn zero_goal_capacity_errors() {
        let (store, rngs) = AgentStoreBuilder::new(ProfileStore::uniform(profile()).unwrap(), 1)
            .goal_capacity(0)
            .build()
            .unwrap();
        let result = SimBuilder::new(test_config(10), store, rngs, StandardBrain).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Basic run ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn runs_to_end_tick() {
        let mut sim = sim_with(3, profile(), test_config(10));
        let mut sink = RecordingSink::new();
        let mut log = Log::default();
        sim.run(&mut arena(), &mut sink, &mut log).unwrap();

        assert_eq!(sim.now(), Tick(10));
        assert_eq!((log.starts, log.ends), (10, 10));
        assert_eq!(log.finished, Some(Tick(10)));
        assert_eq!(sink.intents.len(), 30);
        assert!(log.acted.iter().all(|&n| n == 3));
    }

    #[test]
    fn sink_calls_in_agent_order() {
        let mut sim = sim_with(3, profile(), test_config(2));
        let mut sink = RecordingSink::new();
        sim.run(&mut arena(), &mut sink, &mut NoopObserver).unwrap();
        let order: Vec<u32> = sink.intents.iter().map(|(a, _, _)| a.0).collect();
        assert_eq!(order, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn snapshot_interval_respected() {
        let config = SimConfig { output_interval_ticks: 5, ..test_config(12) };
        let mut sim = sim_with(1, profile(), config);
        let mut log = Log::default();
        sim.run(&mut arena(), &mut RecordingSink::new(), &mut log).unwrap();
        assert_eq!(log.snapshots, vec![Tick(0), Tick(5), Tick(10)]);
    }

    #[test]
    fn agent_without_ship_sits_out() {
        let mut sim = sim_with(3, profile(), test_config(3));
        sim.spawn_agent(&spec(99)).unwrap();
        let mut log = Log::default();
        sim.run(&mut arena(), &mut RecordingSink::new(), &mut log).unwrap();
        assert!(log.acted.iter().all(|&n| n == 3));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let noisy = SkillProfile { accuracy: 0.5, circle_strafe_percent: 30.0, ..profile() };
        let run = || {
            let mut sim = sim_with(3, noisy.clone(), test_config(40));
            for ship in 1..=3 {
                sim.add_goal(ObjectId(ship), Goal::new(GoalKind::AttackAny, 10)).unwrap();
            }
            let mut sink = RecordingSink::new();
            sim.run(&mut arena(), &mut sink, &mut NoopObserver).unwrap();
            sink.intents
        };
        let a = run();
        assert_eq!(a, run());
        assert!(a.iter().any(|(_, _, i)| i.fire_primary.is_some()));
    }
}

// ── Goal intake ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod goal_tests {
    use super::*;

    #[test]
    fn scheduled_order_released_at_its_tick() {
        let mut schedule = GoalSchedule::new();
        schedule.push(Tick(3), GoalOrder::new(ObjectId(1), Goal::new(GoalKind::AttackAny, 10)));
        let (store, rngs) = AgentStoreBuilder::new(ProfileStore::uniform(profile()).unwrap(), 7)
            .spawn(spec(1))
            .build()
            .unwrap();
        let mut sim = SimBuilder::new(test_config(10), store, rngs, StandardBrain)
            .schedule(schedule)
            .build()
            .unwrap();
        let mut world = arena();
        let mut sink = RecordingSink::new();

        sim.run_ticks(3, &mut world, &mut sink, &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].goal_kind, None);

        sim.run_ticks(1, &mut world, &mut sink, &mut NoopObserver).unwrap();
        let t = &sim.telemetry()[0];
        assert_eq!(t.goal_kind, Some("attack_any"));
        assert_eq!(t.mode, Mode::Chase);
        assert_eq!(t.target, Some(ObjectId(10)));
    }

    #[test]
    fn inbox_accepts_orders_from_other_threads() {
        let mut sim = sim_with(2, profile(), test_config(10));
        let inbox = sim.inbox();
        std::thread::spawn(move || {
            inbox.submit(GoalOrder::new(ObjectId(2), Goal::new(GoalKind::StayStill, 5)));
        })
        .join()
        .unwrap();
        assert_eq!(sim.inbox.len(), 1);

        sim.run_ticks(1, &mut arena(), &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert!(sim.inbox.is_empty());
        assert_eq!(sim.telemetry()[1].goal_kind, Some("stay_still"));
    }

    #[test]
    fn rejected_goal_is_error_and_event() {
        let config = SimConfig { goal_capacity: 1, ..test_config(10) };
        let mut sim = sim_with(1, profile(), config);
        sim.add_goal(ObjectId(1), Goal::new(GoalKind::AttackAny, 10)).unwrap();
        let err = sim.add_goal(ObjectId(1), Goal::new(GoalKind::StayStill, 20));
        assert!(matches!(err, Err(SimError::Goal(_))));

        let mut log = Log::default();
        sim.run_ticks(1, &mut arena(), &mut RecordingSink::new(), &mut log).unwrap();
        let rejected = log.kinds("goal_rejected");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].object, ObjectId(1));
        assert_eq!(rejected[0].tick, Tick::ZERO);
    }

    #[test]
    fn exclusive_goal_supersedes() {
        let mut sim = sim_with(1, profile(), test_config(10));
        let exclusive = |kind, p| {
            Goal::new(kind, p).with_flags(wm_goal::GoalFlags { exclusive: true, overridable: true, ..Default::default() })
        };
        sim.add_goal(ObjectId(1), exclusive(GoalKind::AttackAny, 10)).unwrap();
        sim.add_goal(ObjectId(1), exclusive(GoalKind::StayStill, 20)).unwrap();
        let mut log = Log::default();
        sim.run_ticks(1, &mut arena(), &mut RecordingSink::new(), &mut log).unwrap();
        assert_eq!(log.kinds("goal_superseded").len(), 1);
        assert_eq!(sim.telemetry()[0].goal_kind, Some("stay_still"));
    }

    #[test]
    fn unknown_ship_rejected() {
        let mut sim = sim_with(1, profile(), test_config(10));
        let err = sim.add_goal(ObjectId(42), Goal::new(GoalKind::StayStill, 1));
        assert!(matches!(err, Err(SimError::UnknownShip(ObjectId(42)))));
        let err = sim.force_mode(ObjectId(42), Mode::Chase, Tick(5));
        assert!(matches!(err, Err(SimError::UnknownShip(_))));
    }

    #[test]
    fn remove_goal_reselects() {
        let mut sim = sim_with(1, profile(), test_config(10));
        let attack = sim.add_goal(ObjectId(1), Goal::new(GoalKind::AttackAny, 10)).unwrap();
        sim.add_goal(ObjectId(1), Goal::new(GoalKind::StayStill, 1)).unwrap();
        let mut world = arena();
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Chase);

        let removed = sim.remove_goal(ObjectId(1), attack).unwrap();
        assert_eq!(removed.kind, GoalKind::AttackAny);
        assert!(matches!(sim.remove_goal(ObjectId(1), attack), Err(SimError::UnknownGoal { .. })));

        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Idle);
        assert_eq!(sim.telemetry()[0].goal_kind, Some("stay_still"));
    }
}

// ── Targets & overrides ───────────────────────────────────────────────────────

#[cfg(test)]
mod target_tests {
    use super::*;

    fn attack_all(sim: &mut Sim<StandardBrain>) {
        for ship in 1..=3 {
            sim.add_goal(ObjectId(ship), Goal::new(GoalKind::AttackAny, 10)).unwrap();
        }
    }

    #[test]
    fn attacker_cap_holds() {
        let capped = SkillProfile { max_attackers: 1, ..profile() };
        let mut sim = sim_with(3, capped, test_config(10));
        attack_all(&mut sim);
        let mut world = arena();

        for _ in 0..5 {
            sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
            let targets: Vec<ObjectId> = sim.telemetry().iter().filter_map(|t| t.target).collect();
            assert_eq!(targets.len(), 2);
            assert_ne!(targets[0], targets[1]);
            assert_eq!(sim.telemetry()[0].target, Some(ObjectId(10)));
        }
    }

    #[test]
    fn uncapped_agents_share() {
        let mut sim = sim_with(3, profile(), test_config(10));
        attack_all(&mut sim);
        sim.run_ticks(1, &mut arena(), &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert!(sim.telemetry().iter().all(|t| t.target.is_some()));
    }

    #[test]
    fn ignored_target_not_picked() {
        let mut sim = sim_with(1, profile(), test_config(10));
        sim.add_goal(ObjectId(1), Goal::new(GoalKind::AttackAny, 10)).unwrap();
        sim.ignore_target(ObjectId(1), ObjectId(10), Tick(3)).unwrap();
        let mut world = arena();

        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].target, Some(ObjectId(11)));

        sim.unignore_target(ObjectId(1), ObjectId(10)).unwrap();
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        // Last tick's target stays sticky while it remains the best candidate.
        assert!(sim.telemetry()[0].target.is_some());
    }

    #[test]
    fn forced_mode_expires() {
        let mut sim = sim_with(1, profile(), test_config(20));
        sim.force_mode(ObjectId(1), Mode::Chase, Tick(5)).unwrap();
        assert!(matches!(sim.force_mode(ObjectId(1), Mode::Dock, Tick(5)), Err(SimError::Agent(_))));
        let mut world = arena();

        sim.run_ticks(5, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Chase);
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Idle);
    }

    #[test]
    fn cleared_override_reverts_next_tick() {
        let mut sim = sim_with(1, profile(), test_config(20));
        sim.force_mode(ObjectId(1), Mode::Evade, Tick(100)).unwrap();
        let mut world = arena();
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Evade);

        sim.clear_override(ObjectId(1)).unwrap();
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Idle);
    }
}

// ── Removals & spawns ─────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    fn without(ids: &[u32], removed: &[u32]) -> WorldSnapshot {
        let objects = arena_objects().into_iter().filter(|o| !ids.contains(&o.id.0)).collect();
        snapshot(objects, removed)
    }

    #[test]
    fn notified_removal_invalidates_goals_once() {
        let mut sim = sim_with(1, profile(), test_config(10));
        sim.add_goal(ObjectId(1), Goal::new(GoalKind::Attack { target: ObjectId(10) }, 10)).unwrap();
        let mut world = arena();
        let mut log = Log::default();
        sim.run_ticks(2, &mut world, &mut RecordingSink::new(), &mut log).unwrap();
        assert_eq!(sim.telemetry()[0].mode, Mode::Chase);

        sim.notify_object_removed(ObjectId(10));
        world.set(without(&[10], &[]));
        sim.run_ticks(3, &mut world, &mut RecordingSink::new(), &mut log).unwrap();

        let invalidated = log.kinds("goal_invalidated");
        assert_eq!(invalidated.len(), 1);
        assert_eq!(invalidated[0].tick, Tick(2));
        assert_eq!(log.kinds("mode_aborted").len(), 1);
        assert_eq!(sim.telemetry()[0].mode, Mode::Idle);
        assert_eq!(sim.telemetry()[0].goal, None);
    }

    #[test]
    fn silent_disappearance_invalidates_on_revalidation() {
        let mut sim = sim_with(1, profile(), test_config(10));
        sim.add_goal(ObjectId(1), Goal::new(GoalKind::Attack { target: ObjectId(10) }, 10)).unwrap();
        let mut world = arena();
        let mut log = Log::default();
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut log).unwrap();

        world.set(without(&[10], &[]));
        sim.run_ticks(2, &mut world, &mut RecordingSink::new(), &mut log).unwrap();
        assert_eq!(log.kinds("goal_invalidated").len(), 1);
        assert_eq!(log.kinds("mode_aborted").len(), 1);
        assert_eq!(sim.telemetry()[0].mode, Mode::Idle);
    }

    #[test]
    fn snapshot_removal_retires_agent() {
        let mut sim = sim_with(3, profile(), test_config(10));
        let mut world = StaticWorld::new(without(&[2], &[2]));
        let mut sink = RecordingSink::new();
        let mut log = Log::default();
        sim.run_ticks(2, &mut world, &mut sink, &mut log).unwrap();

        assert_eq!(sim.agents.len(), 2);
        let retired = log.kinds("agent_retired");
        assert_eq!(retired.len(), 1);
        assert_eq!((retired[0].agent, retired[0].object), (AgentId(1), ObjectId(2)));
        assert_eq!(sink.for_agent(AgentId(1)).count(), 0);
        assert_eq!(log.acted, vec![2, 2]);
    }

    #[test]
    fn spawn_reuses_retired_slot() {
        let mut sim = sim_with(3, profile(), test_config(10));
        sim.notify_object_removed(ObjectId(2));
        let mut objects = arena_objects();
        objects.retain(|o| o.id != ObjectId(2));
        objects.push(fighter(4, 0, Vec3::new(0.0, 300.0, 0.0)));
        let mut world = StaticWorld::new(snapshot(objects, &[]));
        sim.run_ticks(1, &mut world, &mut RecordingSink::new(), &mut NoopObserver).unwrap();

        let id = sim.spawn_agent(&spec(4)).unwrap();
        assert_eq!(id, AgentId(1));
        let mut sink = RecordingSink::new();
        sim.run_ticks(1, &mut world, &mut sink, &mut NoopObserver).unwrap();
        let (_, object, _) = &sink.intents[1];
        assert_eq!(*object, ObjectId(4));
    }

    #[test]
    fn duplicate_spawn_rejected() {
        let mut sim = sim_with(1, profile(), test_config(10));
        assert!(matches!(sim.spawn_agent(&spec(1)), Err(SimError::Agent(_))));
    }
}
