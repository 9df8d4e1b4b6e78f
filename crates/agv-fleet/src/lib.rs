//! `agv-fleet` — vehicles, payloads, and payload input loading.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`agv`]     | `Agv` state machine, `Fleet` arena, travel/battery math   |
//! | [`payload`] | `Payload`, `Priority`, `PayloadRegistry`                  |
//! | [`loader`]  | CSV payload loader with input validation                  |
//! | [`error`]   | `FleetError`, `LoadError`                                 |
//!
//! # Movement model (hold-until-arrival)
//!
//! A vehicle that starts a segment logically stays at its departure station
//! until `busy_until`; `complete_move` then teleports it to the segment's
//! destination.  Battery is debited when the segment *starts*, so a vehicle
//! that would run flat mid-segment still finishes it — it just cannot start
//! the next one.

pub mod agv;
pub mod error;
pub mod loader;
pub mod payload;

#[cfg(test)]
mod tests;

pub use agv::{Agv, AgvMode, CarriedPayload, Fleet};
pub use error::{FleetError, LoadError};
pub use loader::{load_payloads_csv, load_payloads_reader};
pub use payload::{Payload, PayloadRegistry, Priority};
