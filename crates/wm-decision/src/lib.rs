//! `wm-decision` — turns goals and perception into actuation intents.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`context`]    | `DecisionContext<'w>` — read-only inputs for one agent/tick   |
//! | [`brain`]      | `Brain` trait, `StandardBrain`, `PassiveBrain`, target query  |
//! | [`engine`]     | per-tick mode state machine update                            |
//! | [`transition`] | mode transition table and goal/mode consistency               |
//! | [`intent`]     | `Directive`, `ActionIntent`, `build`, `commit_cooldowns`      |
//! | [`event`]      | `AgentEvent`, `AgentEventKind`                                |
//! | `modes`        | per-mode entry and update logic                               |
//! | `steering`     | small geometric steering helpers                              |
//!
//! # Design notes
//!
//! The orchestrator runs each agent's pipeline in two parallel phases
//! separated by a sequential reconcile step (attacker-cap grants):
//!
//! 1. **Phase A**: goal revalidation, then [`Brain::target_query`] feeds the
//!    perception scan.
//! 2. **Phase B**: [`Brain::think`] runs the engine and builds the
//!    [`ActionIntent`], committing weapon cooldowns.
//!
//! Everything a brain mutates lives in the agent's own `AgentContext` and
//! `AgentRng`, so `Brain` only needs to be `Send + Sync`.

pub mod brain;
pub mod context;
pub mod engine;
pub mod event;
pub mod intent;
pub mod transition;

mod modes;
mod steering;

#[cfg(test)]
mod tests;

pub use brain::{Brain, PassiveBrain, StandardBrain, target_query};
pub use context::DecisionContext;
pub use event::{AgentEvent, AgentEventKind};
pub use intent::{ActionIntent, Directive};
pub use transition::{allowed, consistent, serves};
