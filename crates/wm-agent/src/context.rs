//! `AgentContext` — everything one controlled unit remembers between ticks.

use std::sync::Arc;

use wm_core::{AgentId, GoalId, ObjectId, SkillLevel, SkillProfile, TeamId, Tick};
use wm_goal::{GoalKind, GoalQueue, GoalSubject, Invalidation};
use wm_perception::{IgnoreList, PerceptionMemory};
use wm_world::ObjectFlags;

use crate::{AgentError, AgentResult, Avoidance, Cooldowns, Loadout, Mode, ModeOverride, ModeState, RouteProgress};

/// Per-agent decision state.
///
/// Only the owning agent's pipeline mutates it during a tick; the
/// orchestrator touches it between ticks (goal intake, overrides, removals).
#[derive(Clone, Debug)]
pub struct AgentContext {
    pub id:     AgentId,
    pub object: ObjectId,
    pub team:   TeamId,
    pub skill:  SkillLevel,
    pub profile: Arc<SkillProfile>,
    pub wing_leader: bool,

    pub goals: GoalQueue,
    /// Goals dropped by object removals since the last selection.
    pub removed_goals: Vec<Invalidation>,

    pub mode:          ModeState,
    pub previous_mode: Mode,
    pub mode_entered:  Tick,
    pub mode_override: Option<ModeOverride>,
    pub avoidance:     Option<Avoidance>,
    /// Cursor of the last route mode, kept while its goal stays active.
    pub route:         Option<RouteProgress>,

    pub ignore: IgnoreList,
    /// Most dangerous threat seen last tick.
    pub danger: Option<ObjectId>,
    /// Target granted last tick.
    pub target: Option<ObjectId>,

    pub loadout:   Loadout,
    pub cooldowns: Cooldowns,
    pub memory:    PerceptionMemory,
    /// Shockwaves still in the world that were already rolled against.
    pub shockwaves_seen: Vec<ObjectId>,
}

impl AgentContext {
    pub fn new(
        id:            AgentId,
        spec:          &AgentSpec,
        profile:       Arc<SkillProfile>,
        goal_capacity: usize,
        now:           Tick,
    ) -> Self {
        Self {
            id,
            object: spec.object,
            team: spec.team,
            skill: spec.skill,
            profile,
            wing_leader: spec.wing_leader,
            goals: GoalQueue::new(goal_capacity),
            removed_goals: Vec::new(),
            mode: ModeState::default(),
            previous_mode: Mode::Idle,
            mode_entered: now,
            mode_override: None,
            avoidance: None,
            route: None,
            ignore: IgnoreList::new(),
            danger: None,
            target: None,
            cooldowns: Cooldowns::for_loadout(&spec.loadout),
            loadout: spec.loadout.clone(),
            memory: PerceptionMemory::default(),
            shockwaves_seen: Vec::new(),
        }
    }

    #[inline]
    pub fn current_mode(&self) -> Mode {
        self.mode.mode()
    }

    /// Kind of the active goal, if any.
    pub fn active_goal_kind(&self) -> Option<GoalKind> {
        self.goals.active().map(|g| g.goal.kind)
    }

    /// Permission facts for goal revalidation.
    pub fn goal_subject(&self, flags: ObjectFlags) -> GoalSubject {
        GoalSubject { flags, wing_leader: self.wing_leader }
    }

    /// Replace the running mode, remembering the previous one.
    ///
    /// A route mode re-entered for the goal it last served picks up at the
    /// waypoint it had reached.
    pub fn set_mode(&mut self, mut state: ModeState, now: Tick) {
        RouteProgress::save(&mut self.route, &self.mode);
        RouteProgress::restore(&mut self.route, self.goals.active_id(), &mut state);
        self.previous_mode = self.mode.mode();
        self.mode = state;
        self.mode_entered = now;
    }

    /// Force `mode` until `until`.  Only `Idle`, `Chase` and `Evade` may be
    /// forced; the engine enters the mode on its next update.
    pub fn force_mode(&mut self, mode: Mode, until: Tick) -> AgentResult<()> {
        if !mode.is_forceable() {
            return Err(AgentError::InvalidOverride(mode));
        }
        self.mode_override = Some(ModeOverride { mode, until });
        Ok(())
    }

    /// The override still in force at `now`, if any.
    pub fn active_override(&self, now: Tick) -> Option<ModeOverride> {
        self.mode_override.filter(|o| !o.until.reached(now))
    }

    /// An object left the world: drop the goals and memory that reference it.
    ///
    /// The dropped goals are returned and also kept in `removed_goals` so the
    /// next selection can report them.
    pub fn on_object_removed(&mut self, object: ObjectId) -> Vec<Invalidation> {
        let dropped = self.goals.on_object_removed(object);
        self.removed_goals.extend(dropped.iter().cloned());
        self.forget_object(object);
        dropped
    }

    /// Drop every reference to an object that left the world.
    pub fn forget_object(&mut self, object: ObjectId) {
        self.memory.forget(object);
        self.ignore.remove(object);
        self.shockwaves_seen.retain(|&s| s != object);
        if self.target == Some(object) {
            self.target = None;
        }
        if self.danger == Some(object) {
            self.danger = None;
        }
        if self.avoidance.is_some_and(|a| a.from == object) {
            self.avoidance = None;
        }
    }

    pub fn telemetry(&self) -> AgentTelemetry {
        AgentTelemetry {
            agent:   self.id,
            object:  self.object,
            mode:    self.current_mode(),
            submode: self.mode.submode(),
            goal:    self.goals.active_id(),
            goal_kind: self.active_goal_kind().map(|k| k.as_str()),
            target:  self.target,
        }
    }
}

/// What a host needs to put a unit under AI control.
#[derive(Clone, Debug)]
pub struct AgentSpec {
    pub object:      ObjectId,
    pub team:        TeamId,
    pub skill:       SkillLevel,
    pub loadout:     Loadout,
    pub wing_leader: bool,
}

impl AgentSpec {
    pub fn new(object: ObjectId, team: TeamId, skill: SkillLevel) -> Self {
        Self { object, team, skill, loadout: Loadout::default(), wing_leader: false }
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn wing_leader(mut self, leader: bool) -> Self {
        self.wing_leader = leader;
        self
    }
}

/// Read-only view of an agent for observers and output writers.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentTelemetry {
    pub agent:     AgentId,
    pub object:    ObjectId,
    pub mode:      Mode,
    pub submode:   &'static str,
    pub goal:      Option<GoalId>,
    pub goal_kind: Option<&'static str>,
    pub target:    Option<ObjectId>,
}
