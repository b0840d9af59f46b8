//! Chase: pursue and shoot a non-capital target.
//!
//! `Approach` closes on the target.  Crossing into the engagement envelope
//! rolls the tactic once: circle strafe, glide attack, or a standard pursuit
//! (`SuperAttack` when already on the target's tail, `GetBehind` otherwise).
//! A tactic that runs past the pilot's patience, or loses the envelope,
//! drops back to `Approach` and the next envelope entry rolls again.

use wm_agent::{ChaseSub, ModeState};
use wm_core::{AgentRng, Tick};
use wm_world::{ObjectKind, ObjectState};

use super::{Env, Step, evade_from, strafe, without_target};
use crate::Directive;
use crate::steering::{behind, direction, is_behind, lead, orbit};

/// How far behind the target `GetBehind` aims.
const TAIL_DISTANCE: f32 = 250.0;
/// Leaving this multiple of the envelope ends a tactic.
const ENVELOPE_EXIT: f32 = 1.5;
const ORBIT_RADIUS: f32 = 300.0;
/// Orbit angular speed, radians per second.
const ORBIT_RATE: f32 = 0.6;
const SQUIGGLE_WIDTH: f32 = 150.0;

pub(super) fn enter(now: Tick) -> ModeState {
    ModeState::Chase { sub: ChaseSub::Approach, since: now }
}

pub(super) fn update(sub: &mut ChaseSub, since: &mut Tick, env: &Env<'_, '_>, rng: &mut AgentRng) -> Step {
    let ship = env.ship();
    let now = env.now();
    let Some(target) = env.ctx.target() else {
        set(sub, since, ChaseSub::Approach, now);
        return Step::stay(without_target(env));
    };
    if target.kind == ObjectKind::Capital {
        return Step::to(without_target(env), strafe::enter(now));
    }

    if let Some(threat) = env.danger() {
        if threat.homing || ship.hull < env.profile.courage {
            return evade_from(env, threat, rng);
        }
        if *sub != ChaseSub::EvadeSquiggle {
            set(sub, since, ChaseSub::EvadeSquiggle, now);
        }
    } else if *sub == ChaseSub::EvadeSquiggle {
        set(sub, since, ChaseSub::Approach, now);
    }

    let dist = ship.position.distance(target.position);
    let patience = env.ticks(env.profile.patience_secs);
    match *sub {
        ChaseSub::Approach => {
            if dist <= env.envelope {
                let tactic = roll_tactic(ship, target, env, rng);
                set(sub, since, tactic, now);
            }
        }
        ChaseSub::EvadeSquiggle => {}
        tactic => {
            if now.since(*since) >= patience || dist > env.envelope * ENVELOPE_EXIT {
                set(sub, since, ChaseSub::Approach, now);
            } else if tactic == ChaseSub::GetBehind && is_behind(ship, target) {
                set(sub, since, ChaseSub::SuperAttack, now);
            }
        }
    }

    Step::stay(directive(*sub, *since, ship, target, env, rng))
}

fn set(sub: &mut ChaseSub, since: &mut Tick, next: ChaseSub, now: Tick) {
    *sub = next;
    *since = now;
}

fn roll_tactic(ship: &ObjectState, target: &ObjectState, env: &Env<'_, '_>, rng: &mut AgentRng) -> ChaseSub {
    if rng.roll_percent(env.profile.circle_strafe_percent) {
        ChaseSub::CircleStrafe
    } else if rng.roll_percent(env.profile.glide_attack_percent) {
        ChaseSub::GlideAttack
    } else if is_behind(ship, target) {
        ChaseSub::SuperAttack
    } else {
        ChaseSub::GetBehind
    }
}

fn directive(
    sub:    ChaseSub,
    since:  Tick,
    ship:   &ObjectState,
    target: &ObjectState,
    env:    &Env<'_, '_>,
    rng:    &mut AgentRng,
) -> Directive {
    let dist = ship.position.distance(target.position);
    let d = match sub {
        ChaseSub::Approach => Directive::toward(lead(ship, target), 1.0),
        ChaseSub::GetBehind => Directive::toward(behind(target, TAIL_DISTANCE), 1.0),
        ChaseSub::SuperAttack => {
            let throttle = if dist > env.envelope * 0.5 { 1.0 } else { 0.6 };
            Directive::toward(lead(ship, target), throttle)
        }
        ChaseSub::CircleStrafe => {
            let secs = env.now().since(since) as f32 * env.ctx.clock.tick_secs();
            let point = orbit(target.position, wm_core::Vec3::Z, ORBIT_RADIUS, secs * ORBIT_RATE);
            Directive::toward(point, 0.8)
        }
        // Coast on the current heading with the nose on the target.
        ChaseSub::GlideAttack => Directive::toward(ship.position + ship.velocity, 0.0),
        ChaseSub::EvadeSquiggle => {
            let to_target = direction(ship.position, target.position, ship.forward);
            let side = to_target.any_perpendicular() * (rng.signed_unit() * SQUIGGLE_WIDTH);
            Directive::toward(lead(ship, target) + side, 1.0)
        }
    };
    d.engaging(target)
}
