//! Evade: break away from a threat, weave, or flee.
//!
//! Used as the primary mode of `EvadeShip`, as a forced mode, and as the
//! auxiliary mode attack, guard and travel modes hand over to when a
//! dangerous munition is inbound.  An auxiliary evade runs at least until
//! `until` and resumes the goal's mode once no danger remains.

use wm_agent::{EvadeSub, ModeState};
use wm_core::{AgentRng, ObjectId, Tick, Vec3};
use wm_goal::GoalKind;

use super::{Env, Step};
use crate::Directive;
use crate::steering::{away_from, direction};

/// Minimum run time of an auxiliary evade.
const MIN_EVADE_SECS: f32 = 2.0;
const BREAK_SECS: f32 = 0.75;
/// Seconds between weave direction changes.
const WEAVE_PERIOD_SECS: f32 = 0.8;
const WEAVE_WIDTH: f32 = 300.0;
const RUN_DISTANCE: f32 = 500.0;
const FLEE_DISTANCE: f32 = 2_000.0;

pub(super) fn enter(env: &Env<'_, '_>, from: Option<ObjectId>) -> ModeState {
    ModeState::Evade {
        sub:   EvadeSub::Break,
        since: env.now(),
        until: env.deadline(MIN_EVADE_SECS),
        from,
    }
}

pub(super) fn update(
    sub:   &mut EvadeSub,
    since: &mut Tick,
    until: Tick,
    from:  Option<ObjectId>,
    env:   &Env<'_, '_>,
    rng:   &mut AgentRng,
) -> Step {
    let ship = env.ship();
    let now = env.now();

    if ship.hull < env.profile.courage {
        if *sub != EvadeSub::Flee {
            *sub = EvadeSub::Flee;
            *since = now;
        }
    } else if *sub == EvadeSub::Break && now.since(*since) >= env.ticks(BREAK_SECS) {
        *sub = EvadeSub::Weave;
        *since = now;
    }

    let source = threat_source(from, env);
    let away = direction(source, ship.position, ship.forward);
    let evasion = env.profile.evasion;

    let directive = match *sub {
        // Hard turn across the threat's line of fire.
        EvadeSub::Break => {
            let side = away.any_perpendicular();
            Directive::toward(ship.position + (side * (1.0 + evasion) + away) * RUN_DISTANCE * 0.5, 1.0)
        }
        EvadeSub::Weave => {
            let flips = now.since(*since) / env.ticks(WEAVE_PERIOD_SECS);
            let sign = if flips % 2 == 0 { 1.0 } else { -1.0 };
            let jitter = rng.signed_unit() * 0.25;
            let side = away.any_perpendicular() * ((sign * (0.5 + evasion) + jitter) * WEAVE_WIDTH);
            Directive::toward(ship.position + away * RUN_DISTANCE + side, 1.0)
        }
        EvadeSub::Flee => Directive::toward(away_from(ship, source, FLEE_DISTANCE), 1.0),
    };

    let is_goal = matches!(env.goal, Some(GoalKind::EvadeShip { .. }));
    if !is_goal && until.reached(now) && env.ctx.perception.danger.is_none() {
        return Step::resume(directive);
    }
    Step::stay(directive)
}

/// Where the danger comes from: the evaded ship, else the incoming
/// munition, else straight ahead.
fn threat_source(from: Option<ObjectId>, env: &Env<'_, '_>) -> Vec3 {
    let ship = env.ship();
    from.and_then(|id| env.live(id))
        .map(|o| o.position)
        .or_else(|| env.danger().map(|t| t.position))
        .unwrap_or(ship.position + ship.forward)
}
