//! Per-mode entry and update logic.
//!
//! Every mode exposes `enter(...) -> ModeState` (fresh submode and timers)
//! and `update(...) -> Step`.  An update may change its own submode in
//! place; anything that leaves the mode goes back to the engine as a
//! [`Transition`].

mod chase;
mod dock;
mod evade;
mod guard;
mod idle;
mod path;
mod strafe;
mod waypoint;

use wm_agent::{Mode, ModeState};
use wm_core::{AgentRng, SkillProfile, Tick};
use wm_goal::{GoalKind, InvalidReason};
use wm_perception::Threat;
use wm_world::{ObjectKind, ObjectState};

use crate::{DecisionContext, Directive};

/// Distance from a waypoint or path node that counts as reached.
pub(crate) const WAYPOINT_TOLERANCE: f32 = 50.0;

/// Radius around a guarded ship inside which hostiles are engaged.
pub(crate) const GUARD_RADIUS: f32 = 1_500.0;

/// Engagement envelope without any primary weapon.
const DEFAULT_ENVELOPE: f32 = 800.0;

/// Read-only inputs of a mode update.
pub(crate) struct Env<'a, 'w> {
    pub ctx:      &'a DecisionContext<'w>,
    pub profile:  &'a SkillProfile,
    /// Kind of the active goal.
    pub goal:     Option<GoalKind>,
    /// Distance inside which the agent's primaries can fight.
    pub envelope: f32,
}

impl<'a, 'w> Env<'a, 'w> {
    pub fn new(ctx: &'a DecisionContext<'w>, profile: &'a SkillProfile, goal: Option<GoalKind>, primary_range: f32) -> Self {
        let envelope = if primary_range > 0.0 { primary_range } else { DEFAULT_ENVELOPE };
        Self { ctx, profile, goal, envelope }
    }

    #[inline]
    pub fn ship(&self) -> &'w ObjectState {
        self.ctx.ship
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.ctx.now
    }

    /// Ticks spanning `secs` on this run's clock, at least one.
    pub fn ticks(&self, secs: f32) -> u64 {
        self.ctx.clock.ticks_for_secs(secs).max(1)
    }

    pub fn deadline(&self, secs: f32) -> Tick {
        self.ctx.clock.deadline_after(self.now(), secs)
    }

    /// The most dangerous incoming munition.
    pub fn danger(&self) -> Option<&'w Threat> {
        let perception = self.ctx.perception;
        let id = perception.danger?;
        perception.threats.iter().find(|t| t.munition == id)
    }

    /// A live object by id.
    pub fn live(&self, id: wm_core::ObjectId) -> Option<&'w ObjectState> {
        self.ctx.world.get(id).filter(|o| o.is_alive())
    }
}

/// What leaves the current mode.
#[derive(Debug)]
pub(crate) enum Transition {
    /// Hand over to another mode, subject to the transition table.
    To(ModeState),
    /// An external dependency of the mode vanished; degrade.
    Abort(InvalidReason),
    /// The active goal is done.
    Achieved,
    /// An auxiliary mode is finished; go back to the goal's mode.
    Resume,
}

pub(crate) struct Step {
    pub directive:  Directive,
    pub transition: Option<Transition>,
}

impl Step {
    pub fn stay(directive: Directive) -> Self {
        Self { directive, transition: None }
    }

    pub fn to(directive: Directive, next: ModeState) -> Self {
        Self { directive, transition: Some(Transition::To(next)) }
    }

    pub fn abort(directive: Directive, reason: InvalidReason) -> Self {
        Self { directive, transition: Some(Transition::Abort(reason)) }
    }

    pub fn achieved(directive: Directive) -> Self {
        Self { directive, transition: Some(Transition::Achieved) }
    }

    pub fn resume(directive: Directive) -> Self {
        Self { directive, transition: Some(Transition::Resume) }
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

pub(crate) fn update(state: &mut ModeState, env: &Env<'_, '_>, rng: &mut AgentRng) -> Step {
    match state {
        ModeState::Idle { sub } => idle::update(sub, env, rng),
        ModeState::Chase { sub, since } => chase::update(sub, since, env, rng),
        ModeState::Evade { sub, since, until, from } => evade::update(sub, since, *until, *from, env, rng),
        ModeState::WaypointFollow { sub, path, index, repeat } => {
            waypoint::update(sub, *path, index, *repeat, env, rng)
        }
        ModeState::Guard { sub, protectee } => guard::update(sub, *protectee, env, rng),
        ModeState::Dock { sub, target, bay } => dock::update(sub, *target, *bay, env),
        ModeState::Strafe { sub, since } => strafe::update(sub, since, env, rng),
        ModeState::PathFollow { sub, anchor, path, index } => path::update(sub, *anchor, *path, index, env),
        ModeState::Disabled => Step::stay(Directive::hold(env.ship())),
    }
}

/// Fresh state for a forced mode.
pub(crate) fn enter(mode: Mode, env: &Env<'_, '_>) -> ModeState {
    match mode {
        Mode::Chase => chase::enter(env.now()),
        Mode::Evade => evade::enter(env, env.danger().map(|t| t.owner)),
        Mode::Disabled => ModeState::Disabled,
        _ => idle::enter(),
    }
}

/// Fresh state for the primary mode of `goal`.
pub(crate) fn for_goal(goal: Option<GoalKind>, env: &Env<'_, '_>) -> ModeState {
    let now = env.now();
    match goal {
        None | Some(GoalKind::StayStill) => idle::enter(),
        Some(GoalKind::Attack { target }) => {
            let capital = env.ctx.world.get(target).is_some_and(|o| o.kind == ObjectKind::Capital);
            if capital { strafe::enter(now) } else { chase::enter(now) }
        }
        Some(GoalKind::AttackAny) => chase::enter(now),
        Some(GoalKind::Guard { target }) => guard::enter(target),
        Some(GoalKind::Dock { target, bay }) => dock::enter(target, bay),
        Some(GoalKind::Waypoints { path, repeat }) => waypoint::enter(path, repeat),
        Some(GoalKind::FollowPath { anchor, path }) => path::enter(anchor, path),
        Some(GoalKind::EvadeShip { target }) => evade::enter(env, Some(target)),
    }
}

/// Movement when an attack mode has no granted target: close on the
/// ordered target without firing, or hold.
pub(crate) fn without_target(env: &Env<'_, '_>) -> Directive {
    let ordered = match env.goal {
        Some(GoalKind::Attack { target }) => env.live(target),
        _ => None,
    };
    match ordered {
        Some(t) => Directive::toward(t.position, 1.0),
        None => Directive::hold(env.ship()),
    }
}

/// Hand over to an auxiliary evade, steering with its first update.
pub(crate) fn evade_from(env: &Env<'_, '_>, threat: &Threat, rng: &mut AgentRng) -> Step {
    let mut next = evade::enter(env, Some(threat.owner));
    let directive = update(&mut next, env, rng).directive;
    Step::to(directive, next)
}
