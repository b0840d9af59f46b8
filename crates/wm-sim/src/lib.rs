//! `wm-sim` — tick orchestrator for the wingman combat AI.
//!
//! # Tick pipeline
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Sync      — drain the goal inbox and due scheduled orders, apply
//!                 host-notified removals (retire agents, drop goals).
//!   ② Capture   — WorldSource::capture(tick); removals listed in the
//!                 snapshot are applied like ①.
//!   ③ Phase A   — per agent: goal revalidate/select, perception scan
//!                 (parallel with the `parallel` feature).
//!   ④ Reconcile — attacker-cap grants in ascending AgentId order:
//!                 sticky claims first, then everyone else.
//!   ⑤ Phase B   — per agent: aspect lock, Brain::think, cooldown commit
//!                 (parallel with the `parallel` feature).
//!   ⑥ Apply     — in ascending AgentId order: ActuationSink::apply,
//!                 events, telemetry.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs phases A and B on Rayon's thread pool.             |
//! | `fx-hash`  | FxHash for the attacker ledger.                         |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wm_agent::AgentStoreBuilder;
//! use wm_core::{ProfileStore, SimConfig};
//! use wm_decision::StandardBrain;
//! use wm_sim::{NoopObserver, NullSink, SimBuilder};
//!
//! let (store, rngs) = AgentStoreBuilder::new(profiles, config.seed).spawn(spec).build()?;
//! let mut sim = SimBuilder::new(config, store, rngs, StandardBrain).build()?;
//! sim.run(&mut world, &mut NullSink, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod world_source;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use world_source::{ActuationSink, NullSink, RecordingSink, StaticWorld, WorldSource};
