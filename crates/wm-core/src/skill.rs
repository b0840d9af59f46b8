//! Skill levels and the immutable per-level behavior coefficients.
//!
//! # File format
//!
//! Profiles are authored as one TOML table of per-level arrays, each with
//! exactly [`SkillLevel::COUNT`] entries (index 0 = lowest skill):
//!
//! ```toml
//! accuracy      = [0.30, 0.45, 0.60, 0.80, 0.95]
//! max_attackers = [2, 2, 3, 3, 4]
//! # …one line per coefficient
//! ```
//!
//! Lookup is discrete: a level reads its own column, nothing is
//! interpolated.  A table with a missing coefficient, a wrong-length array
//! or an out-of-range value is rejected at load time.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::{CoreError, CoreResult};

// ── SkillLevel ────────────────────────────────────────────────────────────────

/// Discrete difficulty level of an agent, `0..SkillLevel::COUNT`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct SkillLevel(u8);

impl SkillLevel {
    pub const COUNT: usize = 5;

    pub const VERY_EASY: SkillLevel = SkillLevel(0);
    pub const EASY: SkillLevel = SkillLevel(1);
    pub const MEDIUM: SkillLevel = SkillLevel(2);
    pub const HARD: SkillLevel = SkillLevel(3);
    pub const INSANE: SkillLevel = SkillLevel(4);

    /// `None` if `level` is outside `0..COUNT`.
    pub fn new(level: u8) -> Option<Self> {
        ((level as usize) < Self::COUNT).then_some(SkillLevel(level))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_str(self) -> &'static str {
        match self.0 {
            0 => "very easy",
            1 => "easy",
            2 => "medium",
            3 => "hard",
            _ => "insane",
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SkillProfile ──────────────────────────────────────────────────────────────

/// Every numeric coefficient the decision core reads for one skill level.
///
/// Shared as `Arc<SkillProfile>` by all agents of that level and never
/// mutated after load.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillProfile {
    /// Probability that an otherwise valid primary / secondary shot is taken.
    pub accuracy: f32,
    /// Scales weave amplitude and break-turn aggressiveness, `0..=1`.
    pub evasion: f32,
    /// Hull fraction above which the agent presses an attack under dumbfire.
    pub courage: f32,
    /// Seconds a chase submode may run without progress before re-approach.
    pub patience_secs: f32,
    /// Multiplier on the ship's own sensor range.
    pub sensor_range_scale: f32,
    /// A homing munition is dangerous below this time-to-impact.
    pub missile_danger_secs: f32,
    /// A dumbfire munition is dangerous below this time to closest approach.
    pub dumbfire_danger_secs: f32,
    /// Half-angle of the aspect-lock cone.
    pub aspect_lock_cone_deg: f32,
    /// Seconds of uninterrupted tracking for a full lock.
    pub aspect_lock_secs: f32,
    /// Range inside which a stealthed object is detected directly.
    pub stealth_detect_range: f32,
    /// How long a stealth track stays visible after direct detection ends.
    pub stealth_grace_secs: f32,
    /// Initial half-extent of the sweep box around the last-known position.
    pub stealth_sweep_half: f32,
    /// Per-tick chance that a sweep refreshes the last-known position.
    pub stealth_sweep_chance: f32,
    /// Chance of deploying a countermeasure when locked and off cooldown.
    pub countermeasure_chance: f32,
    pub countermeasure_cooldown_secs: f32,
    /// Percent chance to pick the circle-strafe tactic on engagement.
    pub circle_strafe_percent: f32,
    /// Percent chance to pick the glide-attack tactic on engagement.
    pub glide_attack_percent: f32,
    /// Maximum number of agents of this level that may hold one target.
    pub max_attackers: u32,
    /// Chance of reacting to an incoming shockwave.
    pub shockwave_evade_chance: f32,
    /// Look-ahead for collision hazards.
    pub collision_lookahead_secs: f32,
    /// Duration of an avoidance steering override.
    pub avoidance_secs: f32,
}

impl SkillProfile {
    /// Reference values for a medium-skill pilot.
    ///
    /// Explicit only; agents never fall back to this when a level is
    /// missing from a store.
    pub fn baseline() -> Self {
        Self {
            accuracy: 0.6,
            evasion: 0.5,
            courage: 0.5,
            patience_secs: 6.0,
            sensor_range_scale: 1.0,
            missile_danger_secs: 3.0,
            dumbfire_danger_secs: 1.0,
            aspect_lock_cone_deg: 20.0,
            aspect_lock_secs: 2.0,
            stealth_detect_range: 400.0,
            stealth_grace_secs: 4.0,
            stealth_sweep_half: 300.0,
            stealth_sweep_chance: 0.3,
            countermeasure_chance: 0.5,
            countermeasure_cooldown_secs: 2.0,
            circle_strafe_percent: 20.0,
            glide_attack_percent: 10.0,
            max_attackers: 3,
            shockwave_evade_chance: 0.7,
            collision_lookahead_secs: 2.0,
            avoidance_secs: 1.5,
        }
    }

    fn validate(&self, level: usize) -> CoreResult<()> {
        let prob = [
            ("accuracy", self.accuracy),
            ("evasion", self.evasion),
            ("courage", self.courage),
            ("stealth_sweep_chance", self.stealth_sweep_chance),
            ("countermeasure_chance", self.countermeasure_chance),
            ("shockwave_evade_chance", self.shockwave_evade_chance),
        ];
        for (name, v) in prob {
            if !(0.0..=1.0).contains(&v) {
                return Err(bad(name, level, v, "must be within [0, 1]"));
            }
        }
        for (name, v) in [
            ("circle_strafe_percent", self.circle_strafe_percent),
            ("glide_attack_percent", self.glide_attack_percent),
        ] {
            if !(0.0..=100.0).contains(&v) {
                return Err(bad(name, level, v, "must be within [0, 100]"));
            }
        }
        let positive = [
            ("sensor_range_scale", self.sensor_range_scale),
            ("aspect_lock_secs", self.aspect_lock_secs),
            ("aspect_lock_cone_deg", self.aspect_lock_cone_deg),
        ];
        for (name, v) in positive {
            if !(v > 0.0) || !v.is_finite() {
                return Err(bad(name, level, v, "must be a positive number"));
            }
        }
        let non_negative = [
            ("patience_secs", self.patience_secs),
            ("missile_danger_secs", self.missile_danger_secs),
            ("dumbfire_danger_secs", self.dumbfire_danger_secs),
            ("stealth_detect_range", self.stealth_detect_range),
            ("stealth_grace_secs", self.stealth_grace_secs),
            ("stealth_sweep_half", self.stealth_sweep_half),
            ("countermeasure_cooldown_secs", self.countermeasure_cooldown_secs),
            ("collision_lookahead_secs", self.collision_lookahead_secs),
            ("avoidance_secs", self.avoidance_secs),
        ];
        for (name, v) in non_negative {
            if !(v >= 0.0) || !v.is_finite() {
                return Err(bad(name, level, v, "must be a non-negative number"));
            }
        }
        if self.max_attackers == 0 {
            return Err(bad("max_attackers", level, 0.0, "must be at least 1"));
        }
        Ok(())
    }
}

fn bad(name: &str, level: usize, value: f32, why: &str) -> CoreError {
    CoreError::Profile(format!("{name}[{level}] = {value}: {why}"))
}

// ── TOML table ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileTable {
    accuracy:                     Vec<f32>,
    evasion:                      Vec<f32>,
    courage:                      Vec<f32>,
    patience_secs:                Vec<f32>,
    sensor_range_scale:           Vec<f32>,
    missile_danger_secs:          Vec<f32>,
    dumbfire_danger_secs:         Vec<f32>,
    aspect_lock_cone_deg:         Vec<f32>,
    aspect_lock_secs:             Vec<f32>,
    stealth_detect_range:         Vec<f32>,
    stealth_grace_secs:           Vec<f32>,
    stealth_sweep_half:           Vec<f32>,
    stealth_sweep_chance:         Vec<f32>,
    countermeasure_chance:        Vec<f32>,
    countermeasure_cooldown_secs: Vec<f32>,
    circle_strafe_percent:        Vec<f32>,
    glide_attack_percent:         Vec<f32>,
    max_attackers:                Vec<u32>,
    shockwave_evade_chance:       Vec<f32>,
    collision_lookahead_secs:     Vec<f32>,
    avoidance_secs:               Vec<f32>,
}

fn column<T: Copy>(name: &str, values: &[T]) -> CoreResult<()> {
    if values.len() != SkillLevel::COUNT {
        return Err(CoreError::Profile(format!(
            "{name}: expected {} per-level values, found {}",
            SkillLevel::COUNT,
            values.len()
        )));
    }
    Ok(())
}

impl ProfileTable {
    fn check_lengths(&self) -> CoreResult<()> {
        column("accuracy", &self.accuracy)?;
        column("evasion", &self.evasion)?;
        column("courage", &self.courage)?;
        column("patience_secs", &self.patience_secs)?;
        column("sensor_range_scale", &self.sensor_range_scale)?;
        column("missile_danger_secs", &self.missile_danger_secs)?;
        column("dumbfire_danger_secs", &self.dumbfire_danger_secs)?;
        column("aspect_lock_cone_deg", &self.aspect_lock_cone_deg)?;
        column("aspect_lock_secs", &self.aspect_lock_secs)?;
        column("stealth_detect_range", &self.stealth_detect_range)?;
        column("stealth_grace_secs", &self.stealth_grace_secs)?;
        column("stealth_sweep_half", &self.stealth_sweep_half)?;
        column("stealth_sweep_chance", &self.stealth_sweep_chance)?;
        column("countermeasure_chance", &self.countermeasure_chance)?;
        column("countermeasure_cooldown_secs", &self.countermeasure_cooldown_secs)?;
        column("circle_strafe_percent", &self.circle_strafe_percent)?;
        column("glide_attack_percent", &self.glide_attack_percent)?;
        column("max_attackers", &self.max_attackers)?;
        column("shockwave_evade_chance", &self.shockwave_evade_chance)?;
        column("collision_lookahead_secs", &self.collision_lookahead_secs)?;
        column("avoidance_secs", &self.avoidance_secs)
    }

    fn level(&self, i: usize) -> SkillProfile {
        SkillProfile {
            accuracy:                     self.accuracy[i],
            evasion:                      self.evasion[i],
            courage:                      self.courage[i],
            patience_secs:                self.patience_secs[i],
            sensor_range_scale:           self.sensor_range_scale[i],
            missile_danger_secs:          self.missile_danger_secs[i],
            dumbfire_danger_secs:         self.dumbfire_danger_secs[i],
            aspect_lock_cone_deg:         self.aspect_lock_cone_deg[i],
            aspect_lock_secs:             self.aspect_lock_secs[i],
            stealth_detect_range:         self.stealth_detect_range[i],
            stealth_grace_secs:           self.stealth_grace_secs[i],
            stealth_sweep_half:           self.stealth_sweep_half[i],
            stealth_sweep_chance:         self.stealth_sweep_chance[i],
            countermeasure_chance:        self.countermeasure_chance[i],
            countermeasure_cooldown_secs: self.countermeasure_cooldown_secs[i],
            circle_strafe_percent:        self.circle_strafe_percent[i],
            glide_attack_percent:         self.glide_attack_percent[i],
            max_attackers:                self.max_attackers[i],
            shockwave_evade_chance:       self.shockwave_evade_chance[i],
            collision_lookahead_secs:     self.collision_lookahead_secs[i],
            avoidance_secs:               self.avoidance_secs[i],
        }
    }
}

// ── ProfileStore ──────────────────────────────────────────────────────────────

/// Load-once store of one shared profile per skill level.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    levels: Vec<Arc<SkillProfile>>,
}

impl ProfileStore {
    /// Parse and validate a profile table from TOML text.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let table: ProfileTable =
            toml::from_str(text).map_err(|e| CoreError::Profile(e.to_string()))?;
        table.check_lengths()?;

        let mut levels = Vec::with_capacity(SkillLevel::COUNT);
        for i in 0..SkillLevel::COUNT {
            let profile = table.level(i);
            profile.validate(i)?;
            levels.push(Arc::new(profile));
        }
        tracing::debug!(levels = levels.len(), "loaded skill profiles");
        Ok(Self { levels })
    }

    /// Read and parse a profile table from a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// A store where every level shares `profile` (tests, tools).
    pub fn uniform(profile: SkillProfile) -> CoreResult<Self> {
        profile.validate(0)?;
        let shared = Arc::new(profile);
        Ok(Self {
            levels: vec![shared; SkillLevel::COUNT],
        })
    }

    /// The shared profile for `level`.
    pub fn get(&self, level: SkillLevel) -> CoreResult<Arc<SkillProfile>> {
        self.levels
            .get(level.index())
            .cloned()
            .ok_or_else(|| CoreError::Profile(format!("no profile for skill level {level}")))
    }
}
