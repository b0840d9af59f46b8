//! One agent's perception pass.

use wm_core::AgentRng;

use crate::sensors::prune_tracks;
use crate::targeting::candidates;
use crate::threat::{assess, hazards};
use crate::{IgnoreList, Observer, PerceptionMemory, PerceptionResult, ScanContext, TargetQuery};

/// Build this tick's `PerceptionResult` for `observer`.
///
/// Touches only `memory` and `rng`, both owned by the scanning agent, so
/// scans for different agents may run concurrently.  The granted target and
/// aspect lock are left empty; they are filled after reconciliation.
pub fn scan(
    ctx:      &ScanContext<'_>,
    observer: &Observer<'_>,
    query:    &TargetQuery,
    memory:   &mut PerceptionMemory,
    ignore:   &IgnoreList,
    rng:      &mut AgentRng,
) -> PerceptionResult {
    prune_tracks(ctx, memory);

    let (candidates, visible_stealth) = candidates(ctx, observer, query, memory, ignore, rng);
    let picture = assess(ctx, observer);
    let hazards = hazards(ctx, observer);

    tracing::trace!(
        ship = %observer.ship.id,
        candidates = candidates.len(),
        threats = picture.threats.len(),
        locked_on = picture.missile_locked,
        "scan"
    );

    PerceptionResult {
        candidates,
        target: None,
        threats: picture.threats,
        danger: picture.danger,
        missile_locked: picture.missile_locked,
        visible_stealth,
        aspect_lock: 0.0,
        hazards,
    }
}
