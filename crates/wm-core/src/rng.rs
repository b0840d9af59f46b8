//! Deterministic per-agent and host-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent slot owns an independent `SmallRng` seeded by
//!
//!   seed = global_seed XOR ((slot + generation * 2^32) * MIXING_CONSTANT)
//!
//! where `generation` counts how often the slot has been recycled.  The
//! mixing constant is the 64-bit fractional part of the golden ratio.  Every
//! stochastic decision (accuracy gate, countermeasure chance, tactic roll,
//! stealth sweep) draws from the agent's own RNG, so results do not depend on
//! how agents are spread over worker threads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Lives in `AgentRngs`, parallel to the agent slots, so the decision phase
/// can hold `&mut AgentRng` next to `&mut AgentContext` for the same agent.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent slot.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        Self::for_generation(global_seed, agent, 0)
    }

    /// Seed for the `generation`-th occupant of a recycled slot.
    pub fn for_generation(global_seed: u64, agent: AgentId, generation: u32) -> Self {
        let key = (agent.0 as u64) | ((generation as u64) << 32);
        AgentRng(SmallRng::seed_from_u64(global_seed ^ key.wrapping_mul(MIXING_CONSTANT)))
    }

    /// Uniform sample in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }

    /// Uniform sample in `[-1, 1)`.
    #[inline]
    pub fn signed_unit(&mut self) -> f32 {
        self.0.gen_range(-1.0f32..1.0)
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`.
    ///
    /// `p` is clamped to `[0, 1]`, so `p >= 1` always succeeds.  A NaN
    /// probability never succeeds.
    #[inline]
    pub fn roll(&mut self, p: f32) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0) as f64)
    }

    /// `true` with probability `percent / 100`.
    #[inline]
    pub fn roll_percent(&mut self, percent: f32) -> bool {
        self.roll(percent / 100.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Host-level RNG for world set-up and scripted events.
///
/// Never handed to the decision core; agents only see their own `AgentRng`.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
