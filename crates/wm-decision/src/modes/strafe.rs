//! Strafe: repeated attack runs against a capital ship.
//!
//! `Approach` closes to the envelope, `AttackRun` bores in firing until the
//! break-off distance, `Retreat` opens range again for the next run.
//! `Avoid` pulls away when the run would end in the hull.

use wm_agent::{ModeState, StrafeSub};
use wm_core::{AgentRng, Tick};
use wm_world::ObjectKind;

use super::{Env, Step, chase, evade_from, without_target};
use crate::Directive;
use crate::steering::away_from;

/// Distance from the hull at which an attack run breaks off.
const BREAK_OFF: f32 = 200.0;
/// Retreat until this multiple of the envelope beyond the hull.
const RETREAT_FACTOR: f32 = 2.0;
const AVOID_SECS: f32 = 1.5;

pub(super) fn enter(now: Tick) -> ModeState {
    ModeState::Strafe { sub: StrafeSub::Approach, since: now }
}

pub(super) fn update(sub: &mut StrafeSub, since: &mut Tick, env: &Env<'_, '_>, rng: &mut AgentRng) -> Step {
    let ship = env.ship();
    let now = env.now();
    let Some(target) = env.ctx.target() else {
        return Step::stay(without_target(env));
    };
    if target.kind != ObjectKind::Capital {
        return Step::to(without_target(env), chase::enter(now));
    }
    if let Some(threat) = env.danger() {
        return evade_from(env, threat, rng);
    }

    let surface = ship.position.distance(target.position) - target.radius;
    let colliding = env
        .ctx
        .perception
        .hazards
        .collision
        .as_ref()
        .is_some_and(|h| h.object == target.id);

    let next = match *sub {
        _ if colliding && !matches!(*sub, StrafeSub::Avoid | StrafeSub::Retreat) => StrafeSub::Avoid,
        StrafeSub::Approach if surface <= env.envelope => StrafeSub::AttackRun,
        StrafeSub::AttackRun if surface <= BREAK_OFF => StrafeSub::Retreat,
        StrafeSub::Retreat if surface >= env.envelope * RETREAT_FACTOR => StrafeSub::Approach,
        StrafeSub::Avoid if now.since(*since) >= env.ticks(AVOID_SECS) => StrafeSub::Retreat,
        same => same,
    };
    if next != *sub {
        *sub = next;
        *since = now;
    }

    let directive = match *sub {
        StrafeSub::Approach => Directive::toward(target.position, 1.0),
        StrafeSub::AttackRun => Directive::toward(target.position, 1.0).engaging(target),
        StrafeSub::Retreat | StrafeSub::Avoid => {
            Directive::toward(away_from(ship, target.position, env.envelope), 1.0)
        }
    };
    Step::stay(directive)
}
