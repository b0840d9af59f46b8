//! PathFollow: fly a path defined relative to an anchor object.

use wm_agent::{ModeState, PathSub};
use wm_core::{ObjectId, PathId};
use wm_goal::InvalidReason;

use super::{Env, Step, WAYPOINT_TOLERANCE};
use crate::Directive;

pub(super) fn enter(anchor: ObjectId, path: PathId) -> ModeState {
    ModeState::PathFollow { sub: PathSub::FollowNode, anchor, path, index: 0 }
}

pub(super) fn update(
    sub:    &mut PathSub,
    anchor: ObjectId,
    path:   PathId,
    index:  &mut usize,
    env:    &Env<'_, '_>,
) -> Step {
    let ship = env.ship();
    let Some(base) = env.live(anchor) else {
        return Step::abort(Directive::hold(ship), InvalidReason::TargetGone);
    };
    let Some(route) = env.ctx.world.path(path).filter(|p| !p.is_empty()) else {
        return Step::abort(Directive::hold(ship), InvalidReason::PathMissing);
    };
    if *sub == PathSub::EndOfPath {
        return Step::achieved(Directive::hold(ship));
    }

    let Some(node) = route.resolve(*index, base.position) else {
        return Step::abort(Directive::hold(ship), InvalidReason::PathMissing);
    };
    if ship.position.distance(node) > WAYPOINT_TOLERANCE {
        return Step::stay(Directive::toward(node, 1.0));
    }

    *index += 1;
    match route.resolve(*index, base.position) {
        Some(next) => Step::stay(Directive::toward(next, 1.0)),
        None => {
            *sub = PathSub::EndOfPath;
            Step::achieved(Directive::hold(ship))
        }
    }
}
