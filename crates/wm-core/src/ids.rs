//! Strongly typed identifier wrappers.
//!
//! `ObjectId` is a handle into the world snapshot and is owned by the host
//! simulation.  `AgentId` is the slot of an AI-controlled unit inside the
//! agent store; slots are recycled when units leave the world, so an
//! `AgentId` is only meaningful together with the current store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Handle of an object (ship, munition, shockwave…) in the world snapshot.
    pub struct ObjectId(u32);
}

typed_id! {
    /// Slot of an AI-controlled agent in the agent store.
    pub struct AgentId(u32);
}

typed_id! {
    /// Identifier of a goal, unique within one agent's goal queue.
    pub struct GoalId(u32);
}

typed_id! {
    /// Team (IFF side) an object belongs to.
    pub struct TeamId(u8);
}

typed_id! {
    /// Named waypoint list or object-relative path in the world snapshot.
    pub struct PathId(u16);
}
