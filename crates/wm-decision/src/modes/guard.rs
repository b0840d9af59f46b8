//! Guard: patrol around a friendly ship and engage hostiles that come near.

use wm_agent::{GuardSub, ModeState};
use wm_core::{AgentRng, ObjectId};
use wm_goal::InvalidReason;

use super::{Env, Step, evade_from};
use crate::Directive;
use crate::steering::{lead, orbit};

/// Patrol orbit distance from the protectee's hull.
const PATROL_STANDOFF: f32 = 300.0;
/// Radians per second around the protectee.
const PATROL_RATE: f32 = 0.2;

pub(super) fn enter(protectee: ObjectId) -> ModeState {
    ModeState::Guard { sub: GuardSub::Patrol, protectee }
}

pub(super) fn update(sub: &mut GuardSub, protectee: ObjectId, env: &Env<'_, '_>, rng: &mut AgentRng) -> Step {
    let ship = env.ship();
    let Some(ward) = env.live(protectee) else {
        return Step::abort(Directive::hold(ship), InvalidReason::TargetGone);
    };
    if let Some(threat) = env.danger() {
        return evade_from(env, threat, rng);
    }

    let target = env.ctx.target();
    let orbit_radius = ward.radius + PATROL_STANDOFF;
    *sub = match (*sub, target.is_some()) {
        (_, true) => GuardSub::Engage,
        (GuardSub::Engage, false) => GuardSub::Return,
        (GuardSub::Return, false) if ship.position.distance(ward.position) <= orbit_radius * 1.5 => {
            GuardSub::Patrol
        }
        (other, false) => other,
    };

    let directive = match (*sub, target) {
        (GuardSub::Engage, Some(t)) => Directive::toward(lead(ship, t), 1.0).engaging(t),
        (GuardSub::Patrol, _) => {
            let secs = env.now().0 as f32 * env.ctx.clock.tick_secs();
            let point = orbit(ward.position, wm_core::Vec3::Z, orbit_radius, secs * PATROL_RATE);
            Directive::toward(point, 0.6)
        }
        _ => Directive::toward(ward.position, 1.0),
    };
    Step::stay(directive)
}
