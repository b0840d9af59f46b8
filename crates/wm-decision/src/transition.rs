//! Which mode may follow which, and which modes may serve which goal.
//!
//! [`allowed`] gates transitions requested by a running mode's update.
//! Goal-driven entries (a new active goal, an achieved goal, an expired
//! override) do not go through it; they always enter the goal's own mode,
//! which [`serves`] accepts by construction.

use wm_agent::{AgentContext, Mode};
use wm_core::Tick;
use wm_goal::GoalKind;

/// `true` if a running `from` mode may hand over to `to`.
pub fn allowed(from: Mode, to: Mode) -> bool {
    use Mode::*;
    match (from, to) {
        (Disabled, _) => false,
        (_, Disabled) => true,
        // Degrade on a lost dependency.
        (_, Idle) => true,
        // Auxiliary evade.
        (Idle | Chase | Strafe | Guard | WaypointFollow, Evade) => true,
        (Chase, Strafe) | (Strafe, Chase) => true,
        (Evade, Chase | Strafe | Guard | WaypointFollow) => true,
        _ => false,
    }
}

/// `true` if `mode` may be active while `goal` is the active goal.
pub fn serves(mode: Mode, goal: Option<&GoalKind>) -> bool {
    use Mode::*;
    if mode == Disabled {
        return true;
    }
    match goal {
        None => matches!(mode, Idle | Evade),
        Some(GoalKind::Attack { .. } | GoalKind::AttackAny) => matches!(mode, Chase | Strafe | Evade),
        Some(GoalKind::Guard { .. }) => matches!(mode, Guard | Evade),
        Some(GoalKind::Dock { .. }) => mode == Dock,
        Some(GoalKind::Waypoints { .. }) => matches!(mode, WaypointFollow | Evade),
        Some(GoalKind::FollowPath { .. }) => mode == PathFollow,
        Some(GoalKind::EvadeShip { .. }) => mode == Evade,
        Some(GoalKind::StayStill) => mode == Idle,
    }
}

/// The agent's mode agrees with its override, or else with its active goal.
pub fn consistent(agent: &AgentContext, now: Tick) -> bool {
    let mode = agent.current_mode();
    match agent.active_override(now) {
        Some(o) => mode == o.mode || mode == Mode::Disabled,
        None => serves(mode, agent.active_goal_kind().as_ref()),
    }
}
