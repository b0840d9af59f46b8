//! `wm-world` — the read-only world the decision core perceives.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`object`]   | `ObjectState`, `ObjectKind`, `ObjectFlags`, `Munition`, `DockBay` |
//! | [`path`]     | `WaypointPath`, `PathFrame`                                |
//! | [`snapshot`] | `WorldSnapshot` (R-tree indexed), `WorldSnapshotBuilder`   |
//! | [`iff`]      | `Relation`, `Iff` trait, `IffTable`                        |
//! | [`error`]    | `WorldError`, `WorldResult<T>`                             |
//!
//! The host simulation owns physics and builds a fresh snapshot every tick.
//! Once built, a snapshot is immutable and shared by reference with every
//! agent for the whole decision phase.

pub mod error;
pub mod iff;
pub mod object;
pub mod path;
pub mod snapshot;


pub use error::{WorldError, WorldResult};
pub use iff::{Iff, IffTable, Relation};
pub use object::{DockBay, Munition, ObjectFlags, ObjectKind, ObjectState, Shockwave};
pub use path::{PathFrame, WaypointPath};
pub use snapshot::{WorldSnapshot, WorldSnapshotBuilder};
