//! Strongly typed, zero-cost identifier wrappers.
//!
//! The simulator juggles two edge id spaces: graph edges of the routing
//! network ([`EdgeId`]) and lane-level merged edges of the stepping kernel
//! ([`MergedEdgeId`]).  Keeping them as distinct types means one can never be
//! passed where the other is expected; conversion always goes through the
//! lanemap's explicit mapping table.

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

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
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
    /// Explicit, immutable agent identity.  Assigned at creation and
    /// independent of where the agent is stored.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of an intersection (routing-graph vertex).
    pub struct VertexId(u32);
}

typed_id! {
    /// Index of a directed routing-graph edge ("eid").
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a lane-level merged edge ("mid") in the lanemap.
    pub struct MergedEdgeId(u32);
}
