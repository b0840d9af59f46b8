//! Aspect lock for lock-requiring secondary weapons.
//!
//! Progress grows by `tick_secs / aspect_lock_secs` every tick the target
//! stays visible, inside `lock_range` and inside the
//! `aspect_lock_cone_deg` half-angle around the agent's nose.  A tick that
//! misses any condition, or a change of target, sets progress back to
//! exactly zero.

use wm_core::SkillProfile;
use wm_world::ObjectState;

use crate::AspectLock;

/// Advance or reset `lock` for this tick and return the new progress.
pub fn track(
    lock:       &mut AspectLock,
    ship:       &ObjectState,
    target:     Option<&ObjectState>,
    visible:    bool,
    lock_range: f32,
    profile:    &SkillProfile,
    tick_secs:  f32,
) -> f32 {
    let Some(target) = target else {
        *lock = AspectLock::default();
        return 0.0;
    };
    if lock.target != Some(target.id) {
        *lock = AspectLock { target: Some(target.id), progress: 0.0 };
        return 0.0;
    }

    let to_target = target.position - ship.position;
    let in_cone = ship.forward.angle_deg(to_target) <= profile.aspect_lock_cone_deg;
    let in_range = to_target.length() <= lock_range;

    if visible && in_cone && in_range {
        let step = tick_secs / profile.aspect_lock_secs;
        lock.progress = (lock.progress + step).min(1.0);
    } else {
        lock.reset();
    }
    lock.progress
}
