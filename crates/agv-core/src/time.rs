//! Simulation time model.
//!
//! # Design
//!
//! Time is a count of whole minutes since the 08:00 shift start.  Using an
//! integer minute as the canonical unit means all busy-until and dispatch
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//! Wall-clock `HH:MM` strings exist only at the formatting boundary — the
//! scheduler itself never parses or compares clock strings.

use std::fmt;

/// Minutes-of-day at which every simulation starts (08:00).
pub const SIM_START_MINUTES: u32 = 8 * 60;

/// An absolute simulation timestamp: minutes elapsed since 08:00.
///
/// `u32` is comfortable headroom — a run would have to simulate more than
/// 8,000 years of minutes to overflow.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u32);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// The timestamp `n` minutes after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> SimTime {
        SimTime(self.0 + n)
    }

    /// Minutes elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u32 {
        self.0 - earlier.0
    }

    /// Build a timestamp from a wall-clock hour and minute.
    ///
    /// Times earlier than 08:00 clamp to the shift start — a payload
    /// dispatched "before the doors open" is simply available immediately.
    pub fn from_wall_clock(hour: u32, minute: u32) -> SimTime {
        let minutes_of_day = hour * 60 + minute;
        SimTime(minutes_of_day.saturating_sub(SIM_START_MINUTES))
    }

    /// Wall-clock `(hour, minute)` for this timestamp, wrapping at midnight.
    pub fn wall_clock(self) -> (u32, u32) {
        let total = SIM_START_MINUTES + self.0;
        ((total / 60) % 24, total % 60)
    }
}

impl std::ops::Add<u32> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u32) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::Sub for SimTime {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: SimTime) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for SimTime {
    /// Zero-padded `HH:MM`, the format used in execution-log records.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m) = self.wall_clock();
        write!(f, "{h:02}:{m:02}")
    }
}
