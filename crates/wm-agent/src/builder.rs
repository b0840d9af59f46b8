//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wm_agent::{AgentSpec, AgentStoreBuilder};
//!
//! let (store, rngs) = AgentStoreBuilder::new(profiles, /*seed=*/ 42)
//!     .goal_capacity(8)
//!     .spawn(AgentSpec::new(ObjectId(1), TeamId(0), SkillLevel::HARD))
//!     .spawn(AgentSpec::new(ObjectId(2), TeamId(0), SkillLevel::MEDIUM))
//!     .build()?;
//! ```

use wm_core::{ProfileStore, Tick};

use crate::{AgentResult, AgentRngs, AgentSpec, AgentStore};

pub struct AgentStoreBuilder {
    profiles:      ProfileStore,
    seed:          u64,
    goal_capacity: usize,
    specs:         Vec<AgentSpec>,
}

impl AgentStoreBuilder {
    /// `seed` is the run's global seed; every slot RNG derives from it.
    pub fn new(profiles: ProfileStore, seed: u64) -> Self {
        Self { profiles, seed, goal_capacity: 8, specs: Vec::new() }
    }

    pub fn goal_capacity(mut self, capacity: usize) -> Self {
        self.goal_capacity = capacity;
        self
    }

    /// Queue a unit to be spawned at tick 0.  Agents get ids in call order.
    pub fn spawn(mut self, spec: AgentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.
    ///
    /// Fails on the first `AgentSpec` whose skill level has no profile or whose
    /// object is listed twice.
    pub fn build(self) -> AgentResult<(AgentStore, AgentRngs)> {
        let mut store = AgentStore::new(self.profiles, self.goal_capacity);
        let mut rngs = AgentRngs::new(self.seed);
        for spec in &self.specs {
            store.spawn(spec, &mut rngs, Tick::ZERO)?;
        }
        Ok((store, rngs))
    }
}
