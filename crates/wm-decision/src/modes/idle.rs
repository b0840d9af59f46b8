//! Idle: hold position.

use wm_agent::{IdleSub, ModeState};
use wm_core::AgentRng;

use super::{Env, Step, evade_from};
use crate::Directive;

pub(super) fn enter() -> ModeState {
    ModeState::Idle { sub: IdleSub::Hold }
}

pub(super) fn update(_sub: &mut IdleSub, env: &Env<'_, '_>, rng: &mut AgentRng) -> Step {
    let hold = Directive::hold(env.ship());
    // Only a goal-less agent breaks off to evade; StayStill means stay.
    match env.danger() {
        Some(threat) if env.goal.is_none() => evade_from(env, threat, rng),
        _ => Step::stay(hold),
    }
}
