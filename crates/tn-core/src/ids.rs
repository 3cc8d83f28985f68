//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
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
    };
}

typed_id! {
    /// One navigating agent.  Each agent owns its own executor, search
    /// buffers and fault state.
    pub struct AgentId(u32);
}

typed_id! {
    /// A region (one map/level instance with its own grid and offset).
    pub struct RegionId(u32);
}

typed_id! {
    /// A mobile world entity (monster, NPC, other player).
    pub struct EntityId(u32);
}

typed_id! {
    /// A static-ish world object (door, barrel, shrine, portal…).
    pub struct ObjectId(u32);
}

typed_id! {
    /// Category of an entity as reported by the world (e.g. a specific NPC
    /// class).  Used by region fixups that block terrain around entities.
    pub struct EntityKind(u32);
}
