//! Dock: line up on a bay's approach point, then close on the bay.

use wm_agent::{DockSub, ModeState};
use wm_core::ObjectId;
use wm_goal::InvalidReason;

use super::{Env, Step, WAYPOINT_TOLERANCE};
use crate::Directive;
use crate::steering::arrive;

/// Distance of the approach point out along the bay's outward axis.
const APPROACH_STANDOFF: f32 = 150.0;
/// Distance from the bay that counts as docked.
const DOCKED_TOLERANCE: f32 = 10.0;
const FINAL_THROTTLE: f32 = 0.25;

pub(super) fn enter(target: ObjectId, bay: u8) -> ModeState {
    ModeState::Dock { sub: DockSub::Approach, target, bay }
}

pub(super) fn update(sub: &mut DockSub, target: ObjectId, bay: u8, env: &Env<'_, '_>) -> Step {
    let ship = env.ship();
    let Some(host) = env.live(target) else {
        return Step::abort(Directive::hold(ship), InvalidReason::TargetGone);
    };
    let Some(b) = host.bay(bay) else {
        return Step::abort(Directive::hold(ship), InvalidReason::BayMissing);
    };

    let port = host.position + b.offset;
    let entry = port + b.outward.normalized() * APPROACH_STANDOFF;

    if *sub == DockSub::Approach && ship.position.distance(entry) <= WAYPOINT_TOLERANCE {
        *sub = DockSub::FinalApproach;
    }
    if *sub == DockSub::FinalApproach && ship.position.distance(port) <= DOCKED_TOLERANCE {
        *sub = DockSub::Docked;
    }

    match *sub {
        DockSub::Approach => {
            let dist = ship.position.distance(entry);
            Step::stay(Directive::toward(entry, arrive(dist, 2.0 * APPROACH_STANDOFF)).facing(port))
        }
        DockSub::FinalApproach => Step::stay(Directive::toward(port, FINAL_THROTTLE).facing(port)),
        DockSub::Docked => Step::achieved(Directive::hold(ship)),
    }
}
