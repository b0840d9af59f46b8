//! Fluent builder for constructing a [`Sim`].

use wm_agent::{AgentRngs, AgentStore};
use wm_core::SimConfig;
use wm_decision::Brain;
use wm_goal::{GoalInbox, GoalSchedule};
use wm_world::{Iff, IffTable};

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<B>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick duration, total ticks, seed, …
/// - [`AgentStore`] + [`AgentRngs`] — from [`wm_agent::AgentStoreBuilder`]
/// - `B: Brain` — the decision logic
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                  |
/// |-----------------|------------------------------------------|
/// | `.iff(t)`       | `IffTable::new(2)`: two mutually hostile teams |
/// | `.schedule(s)`  | Empty `GoalSchedule`                     |
/// | `.inbox(i)`     | A fresh `GoalInbox`                      |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(profiles, seed).spawn(spec).build()?;
/// let mut sim = SimBuilder::new(config, store, rngs, StandardBrain)
///     .iff(teams)
///     .schedule(load_orders_csv(path)?)
///     .build()?;
/// ```
pub struct SimBuilder<B: Brain> {
    config:   SimConfig,
    agents:   AgentStore,
    rngs:     AgentRngs,
    brain:    B,
    iff:      Option<Box<dyn Iff>>,
    schedule: Option<GoalSchedule>,
    inbox:    Option<GoalInbox>,
}

impl<B: Brain> SimBuilder<B> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, agents: AgentStore, rngs: AgentRngs, brain: B) -> Self {
        Self { config, agents, rngs, brain, iff: None, schedule: None, inbox: None }
    }

    /// Team relations used by every perception scan.
    pub fn iff(mut self, iff: impl Iff + 'static) -> Self {
        self.iff = Some(Box::new(iff));
        self
    }

    /// Mission orders released at their tick during the sync point.
    pub fn schedule(mut self, schedule: GoalSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Share an inbox created by the host before the sim existed.
    pub fn inbox(mut self, inbox: GoalInbox) -> Self {
        self.inbox = Some(inbox);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<B>> {
        self.config.validate()?;

        let slots = self.agents.slot_count();
        if self.rngs.len() != slots {
            return Err(SimError::AgentCountMismatch {
                expected: slots,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }
        if self.agents.goal_capacity() == 0 {
            return Err(SimError::Config("goal capacity must be at least 1".into()));
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(format!("thread pool: {e}")))?,
            ),
            None => None,
        };

        tracing::debug!(agents = self.agents.len(), seed = self.config.seed, "sim built");
        Ok(Sim {
            clock:          self.config.make_clock(),
            config:         self.config,
            agents:         self.agents,
            rngs:           self.rngs,
            brain:          self.brain,
            iff:            self.iff.unwrap_or_else(|| Box::new(IffTable::new(2))),
            inbox:          self.inbox.unwrap_or_default(),
            schedule:       self.schedule.unwrap_or_default(),
            removals:       Vec::new(),
            pending_events: Vec::new(),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
