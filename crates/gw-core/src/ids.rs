//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Unlike dense array indices these are
//! opaque 64-bit handles minted by the host world, so there is no `.index()`
//! helper — an ID says *which* object, never *where* it is stored.

use std::fmt;

/// Generate a typed ID wrapper around a `u64` handle.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u64);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u64::MAX`.
            pub const INVALID: $name = $name(u64::MAX);

            /// `true` for every value except the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
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

        impl From<u64> for $name {
            #[inline(always)]
            fn from(raw: u64) -> $name {
                $name(raw)
            }
        }

        impl From<$name> for u64 {
            #[inline(always)]
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

typed_id! {
    /// Handle of a world object (structure, block, or tracked contact).
    /// Minted by the host world; stable for the object's lifetime and never
    /// reused within a session.
    pub struct EntityId;
}

typed_id! {
    /// Handle of a connected network participant.  `PeerId::SERVER` is the
    /// authoritative endpoint; every client gets a nonzero handle on connect.
    pub struct PeerId;
}

impl PeerId {
    /// The authoritative server endpoint.
    pub const SERVER: PeerId = PeerId(0);
}
