//! `wm-agent` — per-agent state for the `wingman` combat AI.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`context`] | `AgentContext`, `AgentSpec`, `AgentTelemetry`                |
//! | [`mode`]    | `Mode`, per-mode submodes, `ModeState`, overrides            |
//! | [`loadout`] | `WeaponBank`, `Loadout`, `Cooldowns`                         |
//! | [`store`]   | `AgentStore` (recycling slots), `AgentRngs` (per-slot RNG)   |
//! | [`builder`] | `AgentStoreBuilder` (fluent construction)                    |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                               |

pub mod builder;
pub mod context;
pub mod error;
pub mod loadout;
pub mod mode;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use context::{AgentContext, AgentSpec, AgentTelemetry};
pub use error::{AgentError, AgentResult};
pub use loadout::{Cooldowns, Loadout, WeaponBank};
pub use mode::{
    Avoidance, ChaseSub, DockSub, EvadeSub, GuardSub, IdleSub, Mode, ModeOverride, ModeState,
    PathSub, RouteProgress, StrafeSub, WaypointSub,
};
pub use store::{AgentRngs, AgentStore};
