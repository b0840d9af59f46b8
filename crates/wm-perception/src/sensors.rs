//! Direct detection and stealth tracking.
//!
//! # Stealth tracks
//!
//! A stealthed object is seen directly only inside `stealth_detect_range`
//! or inside a friendly AWACS bubble.  Each direct sighting refreshes a
//! track:
//!
//! ```text
//! last_known = current position
//! deadline   = now + stealth_grace_secs
//! ```
//!
//! Between sightings the object stays visible while `now < deadline` and it
//! is inside a box around `last_known` whose half-extent shrinks linearly
//! from `stealth_sweep_half` to zero at the deadline.  While inside, a
//! `stealth_sweep_chance` roll moves `last_known` to the current position.
//! A sweep never moves the deadline.  At the deadline the track is dropped.

use wm_core::AgentRng;
use wm_world::ObjectState;

use crate::memory::StealthTrack;
use crate::{Observer, PerceptionMemory, ScanContext};

/// `true` if `observer` sees `target` directly this tick.
///
/// `ordered` lifts the sensor-range limit for non-stealthed targets; hidden
/// and stealthed objects still need a real sighting.
pub fn detects_directly(
    ctx:      &ScanContext<'_>,
    observer: &Observer<'_>,
    target:   &ObjectState,
    ordered:  bool,
) -> bool {
    if target.flags.hidden {
        return false;
    }
    if ctx.awacs_covers(observer.ship.team, target.position) {
        return true;
    }
    let d = observer.ship.position.distance(target.position);
    if target.flags.stealth {
        d <= observer.profile.stealth_detect_range
    } else {
        ordered || d <= observer.sensor_range()
    }
}

/// Visibility of a stealthed `target`, updating its track in `memory`.
pub fn stealth_visible(
    ctx:      &ScanContext<'_>,
    observer: &Observer<'_>,
    memory:   &mut PerceptionMemory,
    target:   &ObjectState,
    direct:   bool,
    rng:      &mut AgentRng,
) -> bool {
    let profile = observer.profile;
    if direct {
        let window = ctx.clock.ticks_for_secs(profile.stealth_grace_secs);
        let fresh = StealthTrack {
            object:     target.id,
            last_known: target.position,
            deadline:   ctx.now.offset(window),
            window,
        };
        match memory.track_mut(target.id) {
            Some(t) => *t = fresh,
            None => memory.tracks.push(fresh),
        }
        return true;
    }

    let Some(track) = memory.track_mut(target.id) else {
        return false;
    };
    if track.deadline.reached(ctx.now) {
        memory.drop_track(target.id);
        return false;
    }
    let half = track.sweep_half(ctx.now, profile.stealth_sweep_half);
    if !target.position.within_box(track.last_known, half) {
        return false;
    }
    if rng.roll(profile.stealth_sweep_chance) {
        track.last_known = target.position;
    }
    true
}

/// Drop tracks that expired or whose object is gone.
pub(crate) fn prune_tracks(ctx: &ScanContext<'_>, memory: &mut PerceptionMemory) {
    memory
        .tracks
        .retain(|t| !t.deadline.reached(ctx.now) && ctx.world.is_alive(t.object));
}
