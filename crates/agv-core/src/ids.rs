//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  `AgvId` and `PayloadId` are arena
//! indexes (0-based positions in the fleet and payload registry); `StationId`
//! carries the external 1-based station number straight from the input data
//! and prints as that bare number in execution logs.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to `u32::MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id! {
    /// External station number, 1-based.  Station arrays reserve slot 0 so a
    /// `StationId` indexes them directly without an off-by-one adjustment.
    pub struct StationId(u32);
}

typed_id! {
    /// Index of a vehicle in the fleet arena, in registration order.
    pub struct AgvId(u32);
}

typed_id! {
    /// Index of a payload in the registry's (priority, dispatch-time) order.
    pub struct PayloadId(u32);
}
