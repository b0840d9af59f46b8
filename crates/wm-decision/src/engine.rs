//! The per-tick mode state machine.
//!
//! # Update order
//!
//! 1. A ship at zero hull enters `Disabled`; nothing else runs, then or later.
//! 2. An expired override is dropped and the goal's mode re-entered.  A live
//!    override whose mode is not running is entered.
//! 3. A change of active goal re-enters the goal's mode (entry runs even
//!    when the mode kind is unchanged).  If the goal was invalidated while
//!    its mode ran, `ModeAborted` is reported first, once.
//! 4. The running mode updates and may request a transition.  Requests to
//!    another mode go through [`allowed`]; while an override is active only
//!    `Disabled` may replace it.
//! 5. Collision and shockwave avoidance may replace the steering point (not
//!    the mode) for `avoidance_secs`.

use std::sync::Arc;

use wm_agent::{AgentContext, Avoidance, Mode, ModeState};
use wm_core::{AgentRng, Tick};
use wm_goal::{GoalKind, Selection};

use crate::modes::{self, Env, Transition};
use crate::steering::away_from;
use crate::transition::allowed;
use crate::{AgentEventKind, DecisionContext, Directive};

/// How far an avoidance steering point is placed from the ship.
const AVOID_DISTANCE: f32 = 400.0;

/// Advance `agent`'s mode for this tick and return the movement directive.
pub fn update(
    agent:     &mut AgentContext,
    ctx:       &DecisionContext<'_>,
    selection: &Selection,
    rng:       &mut AgentRng,
    events:    &mut Vec<AgentEventKind>,
) -> Directive {
    let now = ctx.now;
    if agent.mode.is_disabled() {
        return Directive::hold(ctx.ship);
    }
    track_target(agent, ctx, events);

    if ctx.ship.hull <= 0.0 {
        agent.mode_override = None;
        agent.avoidance = None;
        enter(agent, ModeState::Disabled, now, events);
        return Directive::hold(ctx.ship);
    }

    let profile = Arc::clone(&agent.profile);
    let env = Env::new(ctx, &profile, agent.active_goal_kind(), agent.loadout.primary_range());

    // Overrides.
    let mut reenter = false;
    if let Some(o) = agent.mode_override {
        if o.until.reached(now) {
            tracing::debug!(agent = %agent.id, mode = %o.mode, "mode override expired");
            agent.mode_override = None;
            reenter = true;
        } else if agent.current_mode() != o.mode {
            enter(agent, modes::enter(o.mode, &env), now, events);
        }
    }
    let overridden = agent.mode_override.is_some();

    // Goal changes.
    if !overridden {
        if let Some(lost) = selection.invalidated.iter().find(|i| i.was_active) {
            if agent.current_mode() != Mode::Idle {
                abort(agent, lost.reason.as_str(), events);
            }
            reenter = true;
        }
        if reenter || selection.changed {
            enter(agent, modes::for_goal(env.goal, &env), now, events);
        }
    }

    // Mode update.
    let step = modes::update(&mut agent.mode, &env, rng);
    let mut directive = step.directive;
    match step.transition {
        None => {}
        Some(Transition::To(next)) => {
            let (from, to) = (agent.current_mode(), next.mode());
            if overridden && to != Mode::Disabled {
                tracing::trace!(agent = %agent.id, %from, %to, "transition held by override");
            } else if allowed(from, to) {
                enter(agent, next, now, events);
            } else {
                tracing::warn!(agent = %agent.id, %from, %to, "transition rejected");
            }
        }
        Some(Transition::Abort(reason)) => {
            abort(agent, reason.as_str(), events);
            if let Some(id) = agent.goals.active_id() {
                if let Some(goal) = agent.goals.remove_goal(id) {
                    events.push(AgentEventKind::GoalInvalidated { goal: id, kind: goal.kind, reason });
                }
            }
            reselect_and_enter(agent, &env, overridden, events);
        }
        Some(Transition::Achieved) => {
            if let Some(id) = agent.goals.active_id() {
                if let Some(goal) = agent.goals.complete(id) {
                    events.push(AgentEventKind::GoalAchieved { goal: id, kind: goal.kind });
                }
            }
            reselect_and_enter(agent, &env, overridden, events);
        }
        Some(Transition::Resume) => {
            if !overridden {
                let goal = agent.active_goal_kind();
                enter(agent, modes::for_goal(goal, &env), now, events);
            }
        }
    }

    avoid(agent, ctx, &mut directive, rng);
    if ctx.ship.flags.weapons_disabled {
        directive.engage = false;
    }
    directive
}

/// Record this tick's granted target and danger on the agent.
fn track_target(agent: &mut AgentContext, ctx: &DecisionContext<'_>, events: &mut Vec<AgentEventKind>) {
    let granted = ctx.perception.target;
    if granted != agent.target {
        tracing::debug!(agent = %agent.id, from = ?agent.target, to = ?granted, "target changed");
        events.push(AgentEventKind::TargetChanged { from: agent.target, to: granted });
        agent.target = granted;
    }
    agent.memory.previous_target = granted;
    agent.danger = ctx.perception.danger;
}

fn enter(agent: &mut AgentContext, state: ModeState, now: Tick, events: &mut Vec<AgentEventKind>) {
    let mode = state.mode();
    let submode = state.submode();
    agent.set_mode(state, now);
    tracing::debug!(agent = %agent.id, %mode, submode, "mode entered");
    events.push(AgentEventKind::ModeEntered { mode, submode });
}

fn abort(agent: &AgentContext, reason: &'static str, events: &mut Vec<AgentEventKind>) {
    let mode = agent.current_mode();
    tracing::warn!(agent = %agent.id, %mode, reason, "mode aborted");
    events.push(AgentEventKind::ModeAborted { mode, reason });
}

/// Pick the next goal after one was removed mid-update and enter its mode.
fn reselect_and_enter(
    agent:      &mut AgentContext,
    env:        &Env<'_, '_>,
    overridden: bool,
    events:     &mut Vec<AgentEventKind>,
) {
    agent.goals.reselect();
    if !overridden {
        let goal: Option<GoalKind> = agent.active_goal_kind();
        enter(agent, modes::for_goal(goal, env), env.now(), events);
    }
}

/// Collision and shockwave avoidance.
///
/// A collision course or a shockwave the pilot reacts to (rolled once per
/// shockwave while it stays in the world) sets a steering override for
/// `avoidance_secs`.  Collisions
/// with the object the mode is deliberately closing on (dock host, strafe
/// target) are the mode's business.
fn avoid(agent: &mut AgentContext, ctx: &DecisionContext<'_>, directive: &mut Directive, rng: &mut AgentRng) {
    let now = ctx.now;
    let ship = ctx.ship;
    let hazards = &ctx.perception.hazards;

    if agent.avoidance.is_some_and(|a| a.until.reached(now)) {
        agent.avoidance = None;
    }
    agent.shockwaves_seen.retain(|&id| ctx.world.get(id).is_some());

    if agent.avoidance.is_none() {
        let own = match agent.mode {
            ModeState::Dock { target, .. } => Some(target),
            ModeState::Strafe { .. } => ctx.perception.target,
            _ => None,
        };
        let secs = agent.profile.avoidance_secs;
        if let Some(h) = hazards.collision.as_ref().filter(|h| Some(h.object) != own) {
            agent.avoidance = Some(Avoidance {
                steer: away_from(ship, h.point, AVOID_DISTANCE),
                until: ctx.clock.deadline_after(now, secs),
                from:  h.object,
            });
        } else if let Some(s) = hazards.shockwave.as_ref() {
            if !agent.shockwaves_seen.contains(&s.object) {
                agent.shockwaves_seen.push(s.object);
                if rng.roll(agent.profile.shockwave_evade_chance) {
                    agent.avoidance = Some(Avoidance {
                        steer: away_from(ship, s.center, AVOID_DISTANCE),
                        until: ctx.clock.deadline_after(now, secs),
                        from:  s.object,
                    });
                }
            }
        }
        if let Some(a) = agent.avoidance {
            tracing::debug!(agent = %agent.id, from = %a.from, "avoidance engaged");
        }
    }

    if let Some(a) = agent.avoidance {
        directive.steer = a.steer;
    }
}
