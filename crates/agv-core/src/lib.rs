//! `agv-core` — foundational types for the `agv_fleet` scheduling simulator.
//!
//! This crate is a dependency of every other `agv-*` crate.  It intentionally
//! has no `agv-*` dependencies and minimal external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                             |
//! |------------|------------------------------------------------------|
//! | [`ids`]    | `StationId`, `AgvId`, `PayloadId`                    |
//! | [`grid`]   | `GridPoint`, Euclidean distance                      |
//! | [`time`]   | `SimTime` — minutes since the 08:00 shift start      |
//! | [`params`] | Tuning constants and `SimParams`                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod grid;
pub mod ids;
pub mod params;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use grid::GridPoint;
pub use ids::{AgvId, PayloadId, StationId};
pub use params::SimParams;
pub use time::SimTime;
