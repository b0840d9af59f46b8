//! Monotonic tick clock.
//!
//! All timers in the decision core are absolute `Tick` deadlines computed
//! from the clock that is passed in explicitly; nothing reads ambient wall
//! time.  Skill profiles are authored in seconds and converted with
//! [`TickClock::ticks_for_secs`], which rounds up so a cooldown never ends
//! early.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0.saturating_add(n))
    }

    /// Ticks elapsed from `earlier` to `self`, zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `true` once `self` has been reached at `now`.
    #[inline]
    pub fn reached(self, now: Tick) -> bool {
        now >= self
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        self.offset(rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.since(rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Maps ticks to simulated milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickClock {
    /// Simulated milliseconds per tick.
    pub tick_duration_ms: u32,
    /// The current tick — advanced by [`TickClock::advance`] each iteration.
    pub current_tick: Tick,
}

impl TickClock {
    pub fn new(tick_duration_ms: u32) -> Self {
        Self {
            tick_duration_ms,
            current_tick: Tick::ZERO,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.offset(1);
    }

    /// Seconds represented by one tick.
    #[inline]
    pub fn tick_secs(&self) -> f32 {
        self.tick_duration_ms as f32 / 1_000.0
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_ms as u64
    }

    /// How many ticks span `secs` seconds (rounded up; non-positive → 0).
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        if secs.is_nan() || secs <= 0.0 || self.tick_duration_ms == 0 {
            return 0;
        }
        let ms = (secs as f64 * 1_000.0).ceil() as u64;
        ms.div_ceil(self.tick_duration_ms as u64)
    }

    /// Absolute deadline `secs` seconds after `now`.
    #[inline]
    pub fn deadline_after(&self, now: Tick, secs: f32) -> Tick {
        now.offset(self.ticks_for_secs(secs))
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed_ms();
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;
        write!(f, "{} ({:02}:{:02}.{:03})", self.current_tick, mins, secs, millis)
    }
}
