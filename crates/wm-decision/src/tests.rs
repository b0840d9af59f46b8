//! Unit tests for wm-decision.

use std::sync::Arc;

use wm_agent::{AgentContext, AgentSpec, Loadout, WeaponBank};
use wm_core::{AgentId, AgentRng, ObjectId, PathId, SkillLevel, SkillProfile, TeamId, Tick, TickClock, Vec3};
use wm_goal::{Goal, GoalKind};
use wm_perception::{AttackerLedger, Observer, PerceptionResult, ScanContext, aspect};
use wm_world::{
    DockBay, IffTable, Munition, ObjectKind, ObjectState, Shockwave, WaypointPath, WorldSnapshot,
    WorldSnapshotBuilder,
};

use crate::{ActionIntent, AgentEventKind, Brain, DecisionContext, StandardBrain};

// ── Helpers ───────────────────────────────────────────────────────────────────

const ME: ObjectId = ObjectId(1);
const SEED: u64 = 99;

fn ship(id: u32, kind: ObjectKind, team: u8, pos: Vec3) -> ObjectState {
    let mut s = ObjectState::new(ObjectId(id), kind, TeamId(team), pos);
    s.max_speed = 100.0;
    s
}

fn me() -> ObjectState {
    ship(ME.0, ObjectKind::Fighter, 0, Vec3::ZERO)
}

fn snapshot(objects: Vec<ObjectState>, paths: Vec<WaypointPath>) -> WorldSnapshot {
    let mut b = WorldSnapshotBuilder::new(0, Tick::ZERO);
    for o in objects {
        b.add_object(o).unwrap();
    }
    for p in paths {
        b.add_path(p).unwrap();
    }
    b.build()
}

fn sharpshooter() -> SkillProfile {
    SkillProfile {
        accuracy: 1.0,
        circle_strafe_percent: 0.0,
        glide_attack_percent: 0.0,
        ..SkillProfile::baseline()
    }
}

fn guns(cooldown_secs: f32) -> Loadout {
    Loadout { primary: vec![WeaponBank::gun(800.0, cooldown_secs)], ..Loadout::default() }
}

/// One agent driven through the full per-tick pipeline.
struct Rig {
    agent: AgentContext,
    rng:   AgentRng,
    clock: TickClock,
    iff:   IffTable,
}

struct Tock {
    intent:     ActionIntent,
    perception: PerceptionResult,
    events:     Vec<AgentEventKind>,
}

impl Rig {
    fn new(profile: SkillProfile, loadout: Loadout) -> Self {
        let spec = AgentSpec::new(ME, TeamId(0), SkillLevel::MEDIUM).with_loadout(loadout);
        Self {
            agent: AgentContext::new(AgentId(0), &spec, Arc::new(profile), 4, Tick::ZERO),
            rng:   AgentRng::new(SEED, AgentId(0)),
            clock: TickClock::new(100),
            iff:   IffTable::new(2),
        }
    }

    fn goal(&mut self, kind: GoalKind, priority: i32) {
        self.agent.goals.add_goal(Goal::new(kind, priority)).unwrap();
    }

    fn now(&self) -> Tick {
        self.clock.current_tick
    }

    fn tick(&mut self, world: &WorldSnapshot) -> Tock {
        let brain = StandardBrain;
        let ship = world.get(ME).unwrap();
        let profile = Arc::clone(&self.agent.profile);

        let subject = self.agent.goal_subject(ship.flags);
        let mut selection = self.agent.goals.revalidate_and_select(world, &subject);
        let removed = std::mem::take(&mut self.agent.removed_goals);
        selection.invalidated.splice(0..0, removed);

        let query = brain.target_query(&self.agent, self.now());
        let ctx = ScanContext::new(world, &self.iff, &self.clock);
        let observer = Observer::new(ship, &profile);
        let mut perception = wm_perception::scan(
            &ctx,
            &observer,
            &query,
            &mut self.agent.memory,
            &self.agent.ignore,
            &mut self.rng,
        );

        let mut ledger = AttackerLedger::new();
        let cap = profile.max_attackers;
        perception.target = ledger
            .claim_sticky(&perception.candidates, cap)
            .or_else(|| ledger.claim_best(&perception.candidates, cap));
        let target = perception.target.and_then(|id| world.get(id));
        perception.aspect_lock = aspect::track(
            &mut self.agent.memory.aspect,
            ship,
            target,
            target.is_some(),
            self.agent.loadout.lock_range(),
            &profile,
            self.clock.tick_secs(),
        );

        let dctx = DecisionContext::new(world, &perception, ship, &self.clock);
        let mut events = Vec::new();
        let intent = brain.think(&mut self.agent, &dctx, &selection, &mut self.rng, &mut events);
        self.clock.advance();
        Tock { intent, perception, events }
    }
}

fn aborts(events: &[AgentEventKind]) -> usize {
    events.iter().filter(|e| matches!(e, AgentEventKind::ModeAborted { .. })).count()
}

// ── Transition table ──────────────────────────────────────────────────────────

#[cfg(test)]
mod transitions {
    use wm_agent::Mode;
    use wm_goal::GoalKind;

    use crate::{allowed, serves};

    #[test]
    fn disabled_is_terminal() {
        for m in Mode::ALL {
            assert!(!allowed(Mode::Disabled, m));
            assert!(allowed(m, Mode::Disabled) || m == Mode::Disabled);
        }
    }

    #[test]
    fn table_entries() {
        assert!(allowed(Mode::Chase, Mode::Strafe));
        assert!(allowed(Mode::Strafe, Mode::Chase));
        assert!(allowed(Mode::WaypointFollow, Mode::Evade));
        assert!(allowed(Mode::Dock, Mode::Idle));
        assert!(!allowed(Mode::Dock, Mode::Evade));
        assert!(!allowed(Mode::Idle, Mode::Dock));
    }

    #[test]
    fn goal_mode_table() {
        let attack = GoalKind::Attack { target: wm_core::ObjectId(3) };
        assert!(serves(Mode::Strafe, Some(&attack)));
        assert!(serves(Mode::Evade, Some(&attack)));
        assert!(!serves(Mode::Guard, Some(&attack)));
        assert!(serves(Mode::Idle, Some(&GoalKind::StayStill)));
        assert!(!serves(Mode::Evade, Some(&GoalKind::StayStill)));
        assert!(serves(Mode::Evade, None));
        assert!(serves(Mode::Disabled, Some(&GoalKind::AttackAny)));
    }
}

// ── Chase & weapons ───────────────────────────────────────────────────────────

#[cfg(test)]
mod chase {
    use wm_agent::{ChaseSub, Mode, ModeState};

    use super::*;

    fn duel(target_x: f32) -> WorldSnapshot {
        snapshot(vec![me(), ship(2, ObjectKind::Fighter, 1, Vec3::new(target_x, 0.0, 0.0))], vec![])
    }

    #[test]
    fn perfect_accuracy_fires_every_eligible_tick() {
        let mut rig = Rig::new(sharpshooter(), guns(0.0));
        rig.goal(GoalKind::AttackAny, 10);
        let world = duel(400.0);
        for _ in 0..20 {
            let t = rig.tick(&world);
            assert_eq!(t.perception.target, Some(ObjectId(2)));
            assert_eq!(t.intent.fire_primary, Some(0));
        }
    }

    #[test]
    fn cooldown_gates_fire() {
        let mut rig = Rig::new(sharpshooter(), guns(0.25));
        rig.goal(GoalKind::AttackAny, 10);
        let world = duel(400.0);
        let fired: Vec<bool> = (0..10).map(|_| rig.tick(&world).intent.fire_primary.is_some()).collect();
        let expected: Vec<bool> = (0..10).map(|i| i % 3 == 0).collect();
        assert_eq!(fired, expected);
    }

    #[test]
    fn out_of_range_draws_nothing() {
        let mut rig = Rig::new(sharpshooter(), guns(0.0));
        rig.goal(GoalKind::AttackAny, 10);
        let t = rig.tick(&duel(1_500.0));
        assert_eq!(t.intent.fire_primary, None);
        assert_eq!(rig.agent.mode.submode(), "approach");

        let mut fresh = AgentRng::new(SEED, AgentId(0));
        assert_eq!(rig.rng.unit(), fresh.unit());
    }

    #[test]
    fn weapons_disabled_never_fires() {
        let mut rig = Rig::new(sharpshooter(), guns(0.0));
        rig.goal(GoalKind::AttackAny, 10);
        let mut own = me();
        own.flags.weapons_disabled = true;
        let world = snapshot(vec![own, ship(2, ObjectKind::Fighter, 1, Vec3::new(400.0, 0.0, 0.0))], vec![]);
        for _ in 0..5 {
            assert!(!rig.tick(&world).intent.fires());
        }
    }

    #[test]
    fn tactic_rolled_on_envelope_entry_only() {
        let profile = SkillProfile { circle_strafe_percent: 50.0, glide_attack_percent: 50.0, ..sharpshooter() };
        let mut rig = Rig::new(profile, guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);

        for _ in 0..5 {
            rig.tick(&duel(1_500.0));
            assert!(matches!(rig.agent.mode, ModeState::Chase { sub: ChaseSub::Approach, .. }));
        }

        let close = duel(500.0);
        rig.tick(&close);
        let rolled = rig.agent.mode.submode();
        assert_ne!(rolled, "approach");
        // Patience is 6 s; well inside it the tactic must not be re-rolled.
        for _ in 0..30 {
            rig.tick(&close);
            assert_eq!(rig.agent.mode.submode(), rolled);
        }
    }

    #[test]
    fn standard_pursuit_depends_on_position() {
        // Target flies +X; we sit behind it.
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);
        rig.tick(&duel(500.0));
        assert!(matches!(rig.agent.mode, ModeState::Chase { sub: ChaseSub::SuperAttack, .. }));

        // Target faces us.
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);
        let head_on = ship(2, ObjectKind::Fighter, 1, Vec3::new(500.0, 0.0, 0.0)).with_forward(Vec3::new(-1.0, 0.0, 0.0));
        rig.tick(&snapshot(vec![me(), head_on], vec![]));
        assert!(matches!(rig.agent.mode, ModeState::Chase { sub: ChaseSub::GetBehind, .. }));
    }

    #[test]
    fn patience_expiry_returns_to_approach() {
        let profile = SkillProfile { patience_secs: 1.0, ..sharpshooter() };
        let mut rig = Rig::new(profile, guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);
        let world = duel(500.0);
        rig.tick(&world);
        assert_eq!(rig.agent.mode.submode(), "super_attack");
        for _ in 0..10 {
            rig.tick(&world);
        }
        // Patience ran out on the tenth tick.
        assert_eq!(rig.agent.current_mode(), Mode::Chase);
        assert_eq!(rig.agent.mode.submode(), "approach");
    }

    #[test]
    fn capital_target_switches_to_strafe() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);
        let cap = ship(2, ObjectKind::Capital, 1, Vec3::new(1_500.0, 0.0, 0.0)).with_radius(200.0);
        rig.tick(&snapshot(vec![me(), cap], vec![]));
        assert_eq!(rig.agent.current_mode(), Mode::Strafe);
    }

    #[test]
    fn ordered_target_out_of_sight_is_approached_without_fire() {
        let mut rig = Rig::new(sharpshooter(), guns(0.0));
        let mut far = ship(2, ObjectKind::Fighter, 1, Vec3::new(400.0, 0.0, 0.0));
        far.flags.hidden = true;
        rig.goal(GoalKind::Attack { target: ObjectId(2) }, 10);
        let t = rig.tick(&snapshot(vec![me(), far], vec![]));
        assert_eq!(rig.agent.current_mode(), Mode::Chase);
        assert_eq!(t.perception.target, None);
        assert_eq!(t.intent.steer, Vec3::new(400.0, 0.0, 0.0));
        assert!(!t.intent.fires());
    }

    #[test]
    fn target_change_reported() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);
        let t = rig.tick(&duel(500.0));
        assert!(t.events.contains(&AgentEventKind::TargetChanged { from: None, to: Some(ObjectId(2)) }));
        let t = rig.tick(&duel(500.0));
        assert!(!t.events.iter().any(|e| matches!(e, AgentEventKind::TargetChanged { .. })));
        assert_eq!(rig.agent.telemetry().target, Some(ObjectId(2)));
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let profile = SkillProfile {
            accuracy: 0.5,
            circle_strafe_percent: 30.0,
            glide_attack_percent: 30.0,
            ..SkillProfile::baseline()
        };
        let run = || {
            let mut rig = Rig::new(profile.clone(), guns(0.2));
            rig.goal(GoalKind::AttackAny, 10);
            let world = duel(600.0);
            (0..40).map(|_| rig.tick(&world).intent).collect::<Vec<_>>()
        };
        let a = run();
        assert_eq!(a, run());
        assert!(a.iter().any(|i| i.fire_primary.is_some()));
        assert!(a.iter().any(|i| i.fire_primary.is_none()));
    }
}

// ── Intent builder ────────────────────────────────────────────────────────────

#[cfg(test)]
mod intent {
    use wm_perception::Candidate;

    use super::*;
    use crate::Directive;
    use crate::intent::{build, commit_cooldowns};

    fn agent(loadout: Loadout, profile: SkillProfile) -> AgentContext {
        let spec = AgentSpec::new(ME, TeamId(0), SkillLevel::MEDIUM).with_loadout(loadout);
        AgentContext::new(AgentId(0), &spec, Arc::new(profile), 4, Tick::ZERO)
    }

    fn sighted(kind: ObjectKind, lock: f32) -> PerceptionResult {
        PerceptionResult {
            candidates: vec![Candidate {
                id:       ObjectId(2),
                kind,
                position: Vec3::new(500.0, 0.0, 0.0),
                distance: 500.0,
                sticky:   false,
            }],
            target: Some(ObjectId(2)),
            aspect_lock: lock,
            ..PerceptionResult::default()
        }
    }

    fn attack() -> Directive {
        let target = ObjectState::new(ObjectId(2), ObjectKind::Fighter, TeamId(1), Vec3::new(500.0, 0.0, 0.0));
        Directive::toward(target.position, 1.0).engaging(&target)
    }

    fn mixed() -> Loadout {
        Loadout {
            primary: vec![],
            secondary: vec![WeaponBank::seeker(1_500.0, 3.0), WeaponBank::torpedo(1_500.0, 8.0)],
            countermeasures: true,
        }
    }

    #[test]
    fn anti_capital_preferred_against_capitals_only() {
        let a = agent(mixed(), sharpshooter());
        let mut rng = AgentRng::new(1, AgentId(0));
        let i = build(&attack(), &sighted(ObjectKind::Capital, 1.0), &a, Tick::ZERO, &mut rng);
        assert_eq!(i.fire_secondary, Some(1));
        let i = build(&attack(), &sighted(ObjectKind::Fighter, 1.0), &a, Tick::ZERO, &mut rng);
        assert_eq!(i.fire_secondary, Some(0));
    }

    #[test]
    fn lock_required_for_seekers() {
        let a = agent(mixed(), sharpshooter());
        let mut rng = AgentRng::new(1, AgentId(0));
        let i = build(&attack(), &sighted(ObjectKind::Fighter, 0.95), &a, Tick::ZERO, &mut rng);
        assert_eq!(i.fire_secondary, None);
    }

    #[test]
    fn no_engagement_no_fire() {
        let a = agent(guns(0.0), sharpshooter());
        let mut rng = AgentRng::new(1, AgentId(0));
        let d = Directive::toward(Vec3::X, 1.0);
        let i = build(&d, &sighted(ObjectKind::Fighter, 1.0), &a, Tick::ZERO, &mut rng);
        assert!(!i.fires());
    }

    #[test]
    fn countermeasure_respects_cooldown() {
        let profile = SkillProfile { countermeasure_chance: 1.0, ..sharpshooter() };
        let mut a = agent(mixed(), profile);
        let clock = TickClock::new(100);
        let mut rng = AgentRng::new(1, AgentId(0));
        let locked = PerceptionResult { missile_locked: true, ..PerceptionResult::default() };
        let d = Directive::toward(Vec3::X, 1.0);

        let i = build(&d, &locked, &a, Tick(0), &mut rng);
        assert!(i.deploy_countermeasure);
        commit_cooldowns(&mut a, &i, Tick(0), &clock);

        assert!(!build(&d, &locked, &a, Tick(19), &mut rng).deploy_countermeasure);
        assert!(build(&d, &locked, &a, Tick(20), &mut rng).deploy_countermeasure);
    }

    #[test]
    fn secondary_waits_for_full_lock_in_pipeline() {
        let loadout = Loadout { secondary: vec![WeaponBank::seeker(1_500.0, 3.0)], ..Loadout::default() };
        let mut rig = Rig::new(sharpshooter(), loadout);
        rig.goal(GoalKind::AttackAny, 10);
        // Behind the target, nose on it.
        let world = snapshot(vec![me(), ship(2, ObjectKind::Fighter, 1, Vec3::new(500.0, 0.0, 0.0))], vec![]);
        let mut first = None;
        for n in 0..30 {
            let t = rig.tick(&world);
            if t.intent.fire_secondary.is_some() {
                assert!(t.perception.is_locked());
                first.get_or_insert(n);
            }
        }
        let first = first.expect("seeker never fired");
        assert!((20..=21).contains(&first), "first seeker shot on tick {first}");
    }
}

// ── Goals driving modes ───────────────────────────────────────────────────────

#[cfg(test)]
mod goals {
    use wm_agent::Mode;

    use super::*;
    use crate::consistent;

    fn carrier(x: f32) -> ObjectState {
        let mut c = ship(5, ObjectKind::Capital, 0, Vec3::new(x, 0.0, 0.0)).with_radius(150.0);
        c.dock_bays = vec![DockBay { index: 0, offset: Vec3::new(0.0, 160.0, 0.0), outward: Vec3::Y }];
        c
    }

    #[test]
    fn dock_host_destroyed_aborts_once() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::Dock { target: ObjectId(5), bay: 0 }, 10);

        let t = rig.tick(&snapshot(vec![me(), carrier(1_000.0)], vec![]));
        assert_eq!(rig.agent.current_mode(), Mode::Dock);
        assert!(t.events.contains(&AgentEventKind::ModeEntered { mode: Mode::Dock, submode: "approach" }));

        let gone = snapshot(vec![me()], vec![]);
        let t = rig.tick(&gone);
        assert_eq!(aborts(&t.events), 1);
        assert!(t.events.contains(&AgentEventKind::ModeAborted { mode: Mode::Dock, reason: "target gone" }));
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
        assert!(rig.agent.goals.is_empty());

        let t = rig.tick(&gone);
        assert_eq!(aborts(&t.events), 0);
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
    }

    #[test]
    fn removal_notice_aborts_once() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::Dock { target: ObjectId(5), bay: 0 }, 10);
        rig.tick(&snapshot(vec![me(), carrier(1_000.0)], vec![]));

        rig.agent.on_object_removed(ObjectId(5));
        let gone = snapshot(vec![me()], vec![]);
        let t = rig.tick(&gone);
        assert_eq!(aborts(&t.events), 1);
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
    }

    #[test]
    fn docking_completes_goal() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::Dock { target: ObjectId(5), bay: 0 }, 10);
        rig.goal(GoalKind::StayStill, 1);
        // Ship parked on the bay: approach point, then the port itself.
        let on_entry = snapshot(vec![ship(1, ObjectKind::Fighter, 0, Vec3::new(1_000.0, 310.0, 0.0)), carrier(1_000.0)], vec![]);
        rig.tick(&on_entry);
        assert_eq!(rig.agent.mode.submode(), "final_approach");

        let on_port = snapshot(vec![ship(1, ObjectKind::Fighter, 0, Vec3::new(1_000.0, 160.0, 0.0)), carrier(1_000.0)], vec![]);
        let t = rig.tick(&on_port);
        assert!(t.events.iter().any(|e| matches!(e, AgentEventKind::GoalAchieved { .. })));
        assert_eq!(rig.agent.active_goal_kind(), Some(GoalKind::StayStill));
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
    }

    #[test]
    fn equal_priority_first_wins() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::Guard { target: ObjectId(5) }, 10);
        rig.goal(GoalKind::AttackAny, 10);
        rig.tick(&snapshot(vec![me(), carrier(1_000.0)], vec![]));
        assert_eq!(rig.agent.active_goal_kind(), Some(GoalKind::Guard { target: ObjectId(5) }));
        assert_eq!(rig.agent.current_mode(), Mode::Guard);
    }

    #[test]
    fn goal_change_reenters_same_mode() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::AttackAny, 10);
        let world = snapshot(vec![me(), ship(2, ObjectKind::Fighter, 1, Vec3::new(1_500.0, 0.0, 0.0))], vec![]);
        rig.tick(&world);
        rig.goal(GoalKind::Attack { target: ObjectId(2) }, 20);
        let t = rig.tick(&world);
        let entries = t.events.iter().filter(|e| matches!(e, AgentEventKind::ModeEntered { mode: Mode::Chase, .. })).count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn one_shot_waypoints_achieve() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        let path = WaypointPath::world(PathId(1), vec![Vec3::new(30.0, 0.0, 0.0), Vec3::new(900.0, 0.0, 0.0)]);
        rig.goal(GoalKind::Waypoints { path: PathId(1), repeat: false }, 10);

        let t = rig.tick(&snapshot(vec![me()], vec![path.clone()]));
        assert_eq!(t.intent.steer, Vec3::new(900.0, 0.0, 0.0));

        let there = snapshot(vec![ship(1, ObjectKind::Fighter, 0, Vec3::new(900.0, 0.0, 0.0))], vec![path]);
        let t = rig.tick(&there);
        assert!(t.events.iter().any(|e| matches!(e, AgentEventKind::GoalAchieved { .. })));
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
    }

    #[test]
    fn auxiliary_evade_hands_back() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        let path = WaypointPath::world(PathId(1), vec![Vec3::new(5_000.0, 0.0, 0.0)]);
        rig.goal(GoalKind::Waypoints { path: PathId(1), repeat: false }, 10);

        let missile = ObjectState::new(ObjectId(40), ObjectKind::Munition, TeamId(1), Vec3::new(300.0, 0.0, 0.0))
            .with_velocity(Vec3::new(-300.0, 0.0, 0.0))
            .with_munition(Munition { owner: ObjectId(50), owner_team: TeamId(1), target: Some(ME) });
        rig.tick(&snapshot(vec![me(), missile], vec![path.clone()]));
        assert_eq!(rig.agent.current_mode(), Mode::Evade);
        assert!(consistent(&rig.agent, rig.now()));

        let calm = snapshot(vec![me()], vec![path]);
        for _ in 0..25 {
            rig.tick(&calm);
        }
        assert_eq!(rig.agent.current_mode(), Mode::WaypointFollow);
    }

    #[test]
    fn evade_resumes_route_where_it_left_off() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        let path = WaypointPath::world(
            PathId(1),
            vec![Vec3::new(30.0, 0.0, 0.0), Vec3::new(900.0, 0.0, 0.0), Vec3::new(5_000.0, 0.0, 0.0)],
        );
        rig.goal(GoalKind::Waypoints { path: PathId(1), repeat: false }, 10);
        rig.tick(&snapshot(vec![me()], vec![path.clone()]));

        let mid = || ship(1, ObjectKind::Fighter, 0, Vec3::new(900.0, 0.0, 0.0));
        rig.tick(&snapshot(vec![mid()], vec![path.clone()]));
        assert_eq!(rig.agent.mode.route(), Some((PathId(1), 2)));

        let missile = ObjectState::new(ObjectId(40), ObjectKind::Munition, TeamId(1), Vec3::new(1_200.0, 0.0, 0.0))
            .with_velocity(Vec3::new(-300.0, 0.0, 0.0))
            .with_munition(Munition { owner: ObjectId(50), owner_team: TeamId(1), target: Some(ME) });
        let t = rig.tick(&snapshot(vec![mid(), missile], vec![path.clone()]));
        assert_eq!(rig.agent.current_mode(), Mode::Evade);
        assert!(t.intent.throttle > 0.0, "hand-over tick already evades");

        let calm = snapshot(vec![mid()], vec![path]);
        let mut last = None;
        for _ in 0..25 {
            last = Some(rig.tick(&calm));
        }
        assert_eq!(rig.agent.current_mode(), Mode::WaypointFollow);
        assert_eq!(rig.agent.mode.route(), Some((PathId(1), 2)));
        assert_eq!(last.unwrap().intent.steer, Vec3::new(5_000.0, 0.0, 0.0));
    }

    #[test]
    fn stay_still_does_not_evade() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        rig.goal(GoalKind::StayStill, 10);
        let missile = ObjectState::new(ObjectId(40), ObjectKind::Munition, TeamId(1), Vec3::new(300.0, 0.0, 0.0))
            .with_velocity(Vec3::new(-300.0, 0.0, 0.0))
            .with_munition(Munition { owner: ObjectId(50), owner_team: TeamId(1), target: Some(ME) });
        rig.tick(&snapshot(vec![me(), missile], vec![]));
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
    }

    #[test]
    fn zero_hull_is_terminal() {
        let mut rig = Rig::new(sharpshooter(), guns(0.0));
        rig.goal(GoalKind::AttackAny, 10);
        let mut wreck = me();
        wreck.hull = 0.0;
        let world = snapshot(vec![wreck, ship(2, ObjectKind::Fighter, 1, Vec3::new(400.0, 0.0, 0.0))], vec![]);
        let t = rig.tick(&world);
        assert_eq!(rig.agent.current_mode(), Mode::Disabled);
        assert!(t.events.contains(&AgentEventKind::ModeEntered { mode: Mode::Disabled, submode: "" }));
        assert!(!t.intent.fires());

        let t = rig.tick(&world);
        assert!(t.events.is_empty());
        assert_eq!(rig.agent.current_mode(), Mode::Disabled);
    }
}

// ── Overrides & avoidance ─────────────────────────────────────────────────────

#[cfg(test)]
mod overrides {
    use wm_agent::Mode;

    use super::*;

    #[test]
    fn forced_chase_then_silent_revert() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        let world = snapshot(vec![me(), ship(2, ObjectKind::Fighter, 1, Vec3::new(500.0, 0.0, 0.0))], vec![]);
        rig.agent.force_mode(Mode::Chase, Tick(5)).unwrap();

        let t = rig.tick(&world);
        assert_eq!(rig.agent.current_mode(), Mode::Chase);
        assert_eq!(t.perception.target, Some(ObjectId(2)));

        let mut reverted = Vec::new();
        for _ in 1..6 {
            reverted.extend(rig.tick(&world).events);
        }
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
        assert!(rig.agent.mode_override.is_none());
        assert_eq!(aborts(&reverted), 0);
    }

    #[test]
    fn override_holds_against_goal_changes() {
        let mut rig = Rig::new(sharpshooter(), guns(0.5));
        let world = snapshot(vec![me()], vec![]);
        rig.agent.force_mode(Mode::Evade, Tick(50)).unwrap();
        rig.tick(&world);
        rig.goal(GoalKind::StayStill, 10);
        for _ in 0..5 {
            rig.tick(&world);
            assert_eq!(rig.agent.current_mode(), Mode::Evade);
        }
    }

    #[test]
    fn shockwave_rolled_once() {
        let profile = SkillProfile { shockwave_evade_chance: 1.0, avoidance_secs: 0.5, ..sharpshooter() };
        let mut rig = Rig::new(profile, guns(0.5));
        rig.goal(GoalKind::StayStill, 10);
        let mut blast = ObjectState::new(ObjectId(60), ObjectKind::Shockwave, TeamId(1), Vec3::new(-200.0, 0.0, 0.0));
        blast.shockwave = Some(Shockwave { radius: 50.0, max_radius: 600.0, expansion_speed: 100.0 });
        let world = snapshot(vec![me(), blast], vec![]);

        let t = rig.tick(&world);
        assert_eq!(rig.agent.current_mode(), Mode::Idle);
        assert!(t.intent.steer.x > 0.0, "steers away from the blast");
        assert_eq!(rig.agent.shockwaves_seen, vec![ObjectId(60)]);

        // After the override lapses the same blast is not rolled again.
        for _ in 0..10 {
            rig.tick(&world);
        }
        assert!(rig.agent.avoidance.is_none());
        assert_eq!(rig.tick(&world).intent.steer, Vec3::ZERO);

        // Forgotten once the blast is no longer in the snapshot.
        rig.tick(&snapshot(vec![me()], vec![]));
        assert!(rig.agent.shockwaves_seen.is_empty());
    }

    #[test]
    fn passive_brain_holds() {
        use crate::PassiveBrain;
        let world = snapshot(vec![me()], vec![]);
        let clock = TickClock::new(100);
        let perception = PerceptionResult::default();
        let mut rig = Rig::new(sharpshooter(), guns(0.0));
        let ctx = DecisionContext::new(&world, &perception, world.get(ME).unwrap(), &clock);
        let mut events = Vec::new();
        let sel = wm_goal::Selection::default();
        let i = PassiveBrain.think(&mut rig.agent, &ctx, &sel, &mut rig.rng, &mut events);
        assert_eq!(i, ActionIntent::hold(world.get(ME).unwrap()));
        assert!(events.is_empty());
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;
    use wm_agent::Mode;

    use super::*;
    use crate::consistent;

    #[derive(Clone, Debug)]
    enum Op {
        Add(u8, i32),
        RemoveActive,
        Force(u8, u8),
        Tick,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..9u8, -3..3i32).prop_map(|(k, p)| Op::Add(k, p)),
            Just(Op::RemoveActive),
            (0..3u8, 1..8u8).prop_map(|(m, n)| Op::Force(m, n)),
            Just(Op::Tick),
            Just(Op::Tick),
        ]
    }

    fn kind(k: u8) -> GoalKind {
        match k {
            0 => GoalKind::Attack { target: ObjectId(2) },
            1 => GoalKind::Attack { target: ObjectId(3) },
            2 => GoalKind::AttackAny,
            3 => GoalKind::Guard { target: ObjectId(5) },
            4 => GoalKind::Dock { target: ObjectId(5), bay: 0 },
            5 => GoalKind::Waypoints { path: PathId(1), repeat: true },
            6 => GoalKind::FollowPath { anchor: ObjectId(5), path: PathId(2) },
            7 => GoalKind::EvadeShip { target: ObjectId(2) },
            _ => GoalKind::StayStill,
        }
    }

    fn arena() -> WorldSnapshot {
        let mut friend = ship(5, ObjectKind::Capital, 0, Vec3::new(0.0, 800.0, 0.0)).with_radius(150.0);
        friend.dock_bays = vec![DockBay { index: 0, offset: Vec3::new(0.0, 160.0, 0.0), outward: Vec3::Y }];
        let relative = WaypointPath::relative(PathId(2), vec![Vec3::new(400.0, 0.0, 0.0), Vec3::new(0.0, 400.0, 0.0)]);
        snapshot(
            vec![
                me(),
                ship(2, ObjectKind::Fighter, 1, Vec3::new(600.0, 0.0, 0.0)),
                ship(3, ObjectKind::Capital, 1, Vec3::new(3_000.0, 0.0, 0.0)).with_radius(200.0),
                friend,
            ],
            vec![
                WaypointPath::world(PathId(1), vec![Vec3::new(2_000.0, 2_000.0, 0.0), Vec3::new(2_500.0, 2_000.0, 0.0)]),
                relative,
            ],
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn mode_always_serves_goal_or_override(ops in prop::collection::vec(op(), 1..40)) {
            let world = arena();
            let mut rig = Rig::new(SkillProfile::baseline(), guns(0.3));
            for op in ops {
                match op {
                    Op::Add(k, p) => { let _ = rig.agent.goals.add_goal(Goal::new(kind(k), p)); }
                    Op::RemoveActive => {
                        if let Some(id) = rig.agent.goals.active_id() {
                            rig.agent.goals.remove_goal(id);
                        }
                    }
                    Op::Force(m, n) => {
                        let mode = [Mode::Idle, Mode::Chase, Mode::Evade][m as usize];
                        let until = rig.now().offset(n as u64);
                        rig.agent.force_mode(mode, until).unwrap();
                    }
                    Op::Tick => {
                        let now = rig.now();
                        rig.tick(&world);
                        prop_assert!(
                            consistent(&rig.agent, now),
                            "mode {} with goal {:?}",
                            rig.agent.current_mode(),
                            rig.agent.active_goal_kind()
                        );
                    }
                }
            }
        }
    }
}

// ── Events ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use wm_agent::Mode;

    use super::*;

    #[test]
    fn names_and_detail() {
        let e = AgentEventKind::ModeEntered { mode: Mode::Chase, submode: "approach" };
        assert_eq!(e.name(), "mode_entered");
        assert_eq!(e.to_string(), "chase/approach");
        let e = AgentEventKind::TargetChanged { from: None, to: Some(ObjectId(4)) };
        assert_eq!(e.to_string(), "- -> ObjectId(4)");
    }
}
