//! Read-only inputs handed to a brain for one agent on one tick.

use wm_core::{Tick, TickClock};
use wm_perception::PerceptionResult;
use wm_world::{ObjectState, WorldSnapshot};

/// Everything the engine reads besides the agent's own context.
///
/// Built per agent during phase B.  All borrows live for that agent's
/// update only; the snapshot is shared by every agent on the tick.
pub struct DecisionContext<'w> {
    pub world:      &'w WorldSnapshot,
    /// This tick's perception, including the granted target and aspect lock.
    pub perception: &'w PerceptionResult,
    /// The agent's own ship as captured in `world`.
    pub ship:       &'w ObjectState,
    pub now:        Tick,
    pub clock:      &'w TickClock,
}

impl<'w> DecisionContext<'w> {
    #[inline]
    pub fn new(
        world:      &'w WorldSnapshot,
        perception: &'w PerceptionResult,
        ship:       &'w ObjectState,
        clock:      &'w TickClock,
    ) -> Self {
        Self { world, perception, ship, now: clock.current_tick, clock }
    }

    /// The granted target, if it is still in the snapshot and alive.
    pub fn target(&self) -> Option<&'w ObjectState> {
        self.perception
            .target
            .and_then(|id| self.world.get(id))
            .filter(|o| o.is_alive())
    }
}
