//! Top-level run configuration.

use std::path::Path;

use serde::Deserialize;

use crate::{CoreError, CoreResult, Tick, TickClock};

/// Run configuration, usually loaded from TOML by the host application.
///
/// ```toml
/// tick_duration_ms      = 50
/// total_ticks           = 2400
/// seed                  = 42
/// output_interval_ticks = 10
/// goal_capacity         = 8
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Simulated milliseconds per tick.
    pub tick_duration_ms: u32,

    /// Total ticks to simulate with `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed and inputs always produce the same
    /// intents.
    pub seed: u64,

    /// Worker thread count for the parallel phases.  `None` uses all cores.
    #[serde(default)]
    pub num_threads: Option<usize>,

    /// Emit a telemetry snapshot every N ticks.  0 disables snapshots.
    #[serde(default = "default_output_interval")]
    pub output_interval_ticks: u64,

    /// Bounded capacity of each agent's goal queue.
    #[serde(default = "default_goal_capacity")]
    pub goal_capacity: usize,
}

fn default_output_interval() -> u64 {
    1
}

fn default_goal_capacity() -> usize {
    8
}

impl SimConfig {
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let cfg: SimConfig = toml::from_str(text).map_err(|e| CoreError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_duration_ms == 0 {
            return Err(CoreError::Config("tick_duration_ms must be positive".into()));
        }
        if self.goal_capacity == 0 {
            return Err(CoreError::Config("goal_capacity must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// The tick at which `Sim::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> TickClock {
        TickClock::new(self.tick_duration_ms)
    }
}
