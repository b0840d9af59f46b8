//! WaypointFollow: fly a named world-frame waypoint list.

use wm_agent::{ModeState, WaypointSub};
use wm_core::{AgentRng, PathId, Vec3};
use wm_goal::InvalidReason;

use super::{Env, Step, WAYPOINT_TOLERANCE, evade_from};
use crate::Directive;

pub(super) fn enter(path: PathId, repeat: bool) -> ModeState {
    ModeState::WaypointFollow { sub: WaypointSub::Travel, path, index: 0, repeat }
}

pub(super) fn update(
    sub:    &mut WaypointSub,
    path:   PathId,
    index:  &mut usize,
    repeat: bool,
    env:    &Env<'_, '_>,
    rng:    &mut AgentRng,
) -> Step {
    let ship = env.ship();
    let Some(route) = env.ctx.world.path(path).filter(|p| !p.is_empty()) else {
        return Step::abort(Directive::hold(ship), InvalidReason::PathMissing);
    };
    if *sub == WaypointSub::Arrived {
        return Step::achieved(Directive::hold(ship));
    }
    if let Some(threat) = env.danger() {
        return evade_from(env, threat, rng);
    }

    let Some(mut point) = route.resolve(*index, Vec3::ZERO) else {
        return Step::abort(Directive::hold(ship), InvalidReason::PathMissing);
    };
    if ship.position.distance(point) <= WAYPOINT_TOLERANCE {
        *index += 1;
        if *index >= route.len() {
            if !repeat {
                *sub = WaypointSub::Arrived;
                return Step::achieved(Directive::hold(ship));
            }
            *index = 0;
        }
        point = route.resolve(*index, Vec3::ZERO).unwrap_or(point);
    }
    Step::stay(Directive::toward(point, 1.0))
}
