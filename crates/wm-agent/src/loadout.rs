//! Weapon banks and per-bank cooldowns.

use wm_core::{Tick, TickClock};

/// One primary or secondary weapon bank.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponBank {
    /// Effective range in metres.
    pub range:         f32,
    /// Seconds between shots.
    pub cooldown_secs: f32,
    /// Needs a full aspect lock before firing (seeking missiles).
    pub requires_lock: bool,
    /// Preferred against capital ships (torpedoes, bombs).
    pub anti_capital:  bool,
}

impl WeaponBank {
    /// A gun: no lock, not anti-capital.
    pub fn gun(range: f32, cooldown_secs: f32) -> Self {
        Self { range, cooldown_secs, requires_lock: false, anti_capital: false }
    }

    /// A seeking missile.
    pub fn seeker(range: f32, cooldown_secs: f32) -> Self {
        Self { range, cooldown_secs, requires_lock: true, anti_capital: false }
    }

    /// A torpedo: locks and is preferred against capital ships.
    pub fn torpedo(range: f32, cooldown_secs: f32) -> Self {
        Self { range, cooldown_secs, requires_lock: true, anti_capital: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Loadout {
    pub primary:         Vec<WeaponBank>,
    pub secondary:       Vec<WeaponBank>,
    /// Countermeasure launcher fitted.
    pub countermeasures: bool,
}

impl Loadout {
    /// Longest primary range, 0 without primaries.
    pub fn primary_range(&self) -> f32 {
        self.primary.iter().map(|b| b.range).fold(0.0, f32::max)
    }

    /// Longest range of a lock-requiring secondary; the aspect-lock range.
    pub fn lock_range(&self) -> f32 {
        self.secondary
            .iter()
            .filter(|b| b.requires_lock)
            .map(|b| b.range)
            .fold(0.0, f32::max)
    }
}

// ── Cooldowns ─────────────────────────────────────────────────────────────────

/// Absolute ready ticks for every bank and the countermeasure launcher.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cooldowns {
    primary:        Vec<Tick>,
    secondary:      Vec<Tick>,
    countermeasure: Tick,
}

impl Cooldowns {
    /// All banks of `loadout` ready at tick 0.
    pub fn for_loadout(loadout: &Loadout) -> Self {
        Self {
            primary:        vec![Tick::ZERO; loadout.primary.len()],
            secondary:      vec![Tick::ZERO; loadout.secondary.len()],
            countermeasure: Tick::ZERO,
        }
    }

    pub fn primary_ready(&self, bank: usize, now: Tick) -> bool {
        self.primary.get(bank).is_some_and(|t| t.reached(now))
    }

    pub fn secondary_ready(&self, bank: usize, now: Tick) -> bool {
        self.secondary.get(bank).is_some_and(|t| t.reached(now))
    }

    pub fn countermeasure_ready(&self, now: Tick) -> bool {
        self.countermeasure.reached(now)
    }

    pub fn commit_primary(&mut self, bank: usize, secs: f32, now: Tick, clock: &TickClock) {
        if let Some(t) = self.primary.get_mut(bank) {
            *t = clock.deadline_after(now, secs);
        }
    }

    pub fn commit_secondary(&mut self, bank: usize, secs: f32, now: Tick, clock: &TickClock) {
        if let Some(t) = self.secondary.get_mut(bank) {
            *t = clock.deadline_after(now, secs);
        }
    }

    pub fn commit_countermeasure(&mut self, secs: f32, now: Tick, clock: &TickClock) {
        self.countermeasure = clock.deadline_after(now, secs);
    }
}
