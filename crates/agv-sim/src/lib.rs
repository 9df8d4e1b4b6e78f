//! `agv-sim` — the discrete-event scheduling loop.
//!
//! # Three-phase tick loop
//!
//! ```text
//! loop:
//!   — terminate when every payload is delivered —
//!   Ⓐ Completions — vehicles whose busy_until has passed finish their
//!                    segment or charge; arrivals detach payloads whose
//!                    destination this is and record delivery latencies.
//!   Ⓑ Assignments — each idle vehicle, in fleet order, gets one action
//!                    from the dispatch policy (hop / charge / pickup).
//!   Ⓒ Clock       — if neither phase did anything, jump to the next
//!                    event (earliest busy_until or future dispatch), or
//!                    by a fixed fallback when no event exists; after
//!                    MAX_STUCK consecutive idle ticks declare deadlock.
//! ```
//!
//! The loop is single-threaded and deterministic: within a tick all
//! processing follows fleet registration order, Ⓐ fully precedes Ⓑ, and
//! the move log mirrors action order exactly.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use agv_dispatch::PriorityLadder;
//! use agv_fleet::Fleet;
//! use agv_network::StationNetwork;
//! use agv_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(
//!     StationNetwork::grid_default(),
//!     Fleet::default_trio(),
//!     payloads,
//!     PriorityLadder,
//! )
//! .build()?;
//! let outcome = sim.run(&mut NoopObserver)?;
//! println!("{:?}: {} min", outcome, sim.metrics().makespan_minutes);
//! ```

pub mod builder;
pub mod error;
pub mod metrics;
pub mod movelog;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use metrics::{MetricsRecorder, SimMetrics};
pub use movelog::MoveRecord;
pub use observer::{NoopObserver, SimObserver};
pub use sim::{RunOutcome, Sim};
