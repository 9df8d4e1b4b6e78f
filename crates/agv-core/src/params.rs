//! Fleet tuning constants and run parameters.
//!
//! The constants come from the transport-system requirements and are shared
//! by the state machine (travel time, battery drain), the dispatch policy
//! (battery thresholds) and input validation (weight range).  Values that a
//! deployment could plausibly retune — which station charges, how the
//! deadlock detector behaves — live in [`SimParams`] instead.

use crate::StationId;

// ── Capacity and travel ──────────────────────────────────────────────────────

/// Maximum total payload weight a vehicle can carry.
pub const MAX_CAPACITY: f64 = 10.0;

/// Minutes to traverse one distance unit with no load.
pub const EMPTY_TRAVEL_MIN_PER_UNIT: u32 = 5;

/// Minutes to traverse one distance unit at full capacity.
pub const FULL_TRAVEL_MIN_PER_UNIT: u32 = 10;

// ── Battery ──────────────────────────────────────────────────────────────────

/// Minutes a charge cycle takes; completion always restores 100%.
pub const CHARGE_DURATION_MIN: u32 = 15;

/// Minutes of continuous full-load travel that drain a full battery.
pub const DISCHARGE_REFERENCE_MIN: u32 = 45;

/// Below this level an unladen vehicle detours to the charger.
pub const LOW_BATTERY_THRESHOLD: f64 = 30.0;

/// Minimum battery required to accept a new pickup.
pub const MIN_BATTERY_FOR_PICKUP: f64 = 20.0;

/// Below this level a vehicle abandons everything and heads to the charger.
pub const CRITICAL_BATTERY: f64 = 10.0;

/// A freshly charged battery.
pub const FULL_BATTERY: f64 = 100.0;

/// Upper bound on battery drained by a single segment.
pub const MAX_DRAIN_PER_MOVE: f64 = 30.0;

// ── SimParams ────────────────────────────────────────────────────────────────

/// Per-run parameters.  `Default` matches the reference deployment.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimParams {
    /// The station vehicles charge at.  May be absent from a given network,
    /// in which case charging rules simply never find a route to it.
    pub charging_station: StationId,

    /// Consecutive no-progress ticks before the run is declared deadlocked.
    pub max_stuck_ticks: u32,

    /// Clock advance used when no future event exists to jump to.
    pub fallback_advance_min: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            charging_station:     StationId(9),
            max_stuck_ticks:      5,
            fallback_advance_min: 5,
        }
    }
}
