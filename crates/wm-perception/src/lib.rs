//! `wm-perception` — what an agent can see, and what it should worry about.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`context`]   | `ScanContext` (per tick), `Observer` (per agent)          |
//! | [`sensors`]   | direct detection and the stealth-track update             |
//! | [`targeting`] | `TargetQuery`, `IgnoreList`, candidate search and ranking |
//! | [`ledger`]    | `AttackerLedger`: attacker-count cap across agents        |
//! | [`threat`]    | incoming munitions, missile lock, collision and shockwave hazards |
//! | [`aspect`]    | aspect-lock accumulation                                  |
//! | [`memory`]    | `PerceptionMemory`: what survives from one tick to the next |
//! | [`result`]    | `PerceptionResult` and its records                        |
//! | [`scan`]      | `scan`: one agent's full perception pass                  |
//!
//! # Per-tick flow
//!
//! ```text
//! ScanContext::new(world, iff, clock)        once per tick
//!   → scan(ctx, observer, query, memory, …)  per agent, parallel-safe
//!   → AttackerLedger                         sequential, ascending AgentId
//!   → aspect::track                          per agent, after the grant
//! ```
//!
//! A `PerceptionResult` is rebuilt from scratch every tick and is never
//! stored in the agent.  Only `PerceptionMemory` (stealth tracks, aspect
//! lock, previous target) persists.

pub mod aspect;
pub mod context;
pub mod ledger;
pub mod memory;
pub mod result;
pub mod scan;
pub mod sensors;
pub mod targeting;
pub mod threat;


pub use context::{Observer, ScanContext};
pub use ledger::AttackerLedger;
pub use memory::{AspectLock, PerceptionMemory, StealthTrack};
pub use result::{Candidate, CollisionHazard, Hazards, PerceptionResult, ShockwaveHazard, Threat};
pub use scan::scan;
pub use targeting::{IgnoreList, TargetQuery};
