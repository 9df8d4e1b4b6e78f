//! Simulation observer trait for progress reporting and log capture.

use agv_core::SimTime;
use agv_fleet::Priority;

use crate::movelog::MoveRecord;
use crate::sim::RunOutcome;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] as the schedule
/// unfolds.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Hooks fire in event order, which
/// within a tick is fleet order.
pub trait SimObserver {
    /// A vehicle initiated a hop.  Fires once per execution-log record.
    fn on_move(&mut self, _record: &MoveRecord) {}

    /// A payload came aboard a vehicle.
    fn on_pickup(&mut self, _agv: &str, _payload: &str, _now: SimTime) {}

    /// A payload reached its destination.
    fn on_delivery(&mut self, _payload: &str, _priority: Priority, _latency_min: u32, _now: SimTime) {}

    /// A charge cycle began.
    fn on_charge_start(&mut self, _agv: &str, _now: SimTime) {}

    /// A charge cycle finished (battery back to 100%).
    fn on_charge_complete(&mut self, _agv: &str, _now: SimTime) {}

    /// The clock jumped because no action was possible at the old time.
    fn on_clock_advance(&mut self, _now: SimTime) {}

    /// The deadlock detector fired; the run will terminate.
    fn on_deadlock(&mut self, _now: SimTime) {}

    /// Called once after the loop ends.
    fn on_sim_end(&mut self, _outcome: RunOutcome, _now: SimTime) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
