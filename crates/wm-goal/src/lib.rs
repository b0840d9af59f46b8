//! `wm-goal` — what each agent is trying to achieve.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`goal`]     | `Goal`, `GoalKind`, `GoalSource`, `GoalFlags`, `GoalOrder`  |
//! | [`queue`]    | `GoalQueue`, `Selection`, `Invalidation`, `GoalSubject`    |
//! | [`inbox`]    | `GoalInbox` (thread-safe submission handle)                |
//! | [`schedule`] | `GoalSchedule` (`BTreeMap<Tick, Vec<GoalOrder>>`)          |
//! | [`loader`]   | `load_orders_csv`, `load_orders_reader`                    |
//! | [`error`]    | `GoalError`, `RejectReason`, `GoalResult<T>`               |
//!
//! # Selection model (summary)
//!
//! Every tick each agent's queue drops goals that are no longer valid
//! against the fresh world snapshot, then orders the survivors by
//!
//! ```text
//! (priority desc, insertion sequence asc)
//! ```
//!
//! and makes the first one active, unless the current active goal is still
//! valid and flagged `must_complete`.  Goals issued from outside the tick
//! loop go through [`GoalInbox`] or [`GoalSchedule`] and reach the queues
//! only at the sync point between ticks.

pub mod error;
pub mod goal;
pub mod inbox;
pub mod loader;
pub mod queue;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use error::{GoalError, GoalResult, RejectReason};
pub use goal::{Goal, GoalFlags, GoalKind, GoalOrder, GoalSource};
pub use inbox::GoalInbox;
pub use loader::{load_orders_csv, load_orders_reader};
pub use queue::{GoalQueue, GoalSubject, InvalidReason, Invalidation, QueuedGoal, Selection};
pub use schedule::GoalSchedule;
