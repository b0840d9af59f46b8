//! `wm-core` — foundational types for the `wingman` combat AI.
//!
//! Every other `wm-*` crate depends on this one.  It has no `wm-*`
//! dependencies and keeps its external ones small (`rand`, `serde`, `toml`,
//! `thiserror`, `tracing`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `ObjectId`, `AgentId`, `GoalId`, `TeamId`, `PathId`      |
//! | [`math`]    | `Vec3` and the few geometric helpers the AI needs        |
//! | [`time`]    | `Tick`, `TickClock`                                      |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (host-side)             |
//! | [`skill`]   | `SkillLevel`, `SkillProfile`, `ProfileStore`             |
//! | [`config`]  | `SimConfig` (TOML)                                       |
//! | [`error`]   | `CoreError`, `CoreResult`                                |

pub mod config;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod skill;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, GoalId, ObjectId, PathId, TeamId};
pub use math::Vec3;
pub use rng::{AgentRng, SimRng};
pub use skill::{ProfileStore, SkillLevel, SkillProfile};
pub use time::{Tick, TickClock};
