//! Dispatch actions — what a policy asks one vehicle to do this tick.

use agv_core::{PayloadId, StationId};

/// Why a hop was initiated.  Carried through to logging so the execution
/// trace explains itself.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum HopPurpose {
    /// Critically low battery — heading for the charger, laden or not.
    CriticalCharge,
    /// Moving held payloads toward a delivery station.
    Deliver,
    /// Battery below the comfort threshold and nothing aboard.
    PreventiveCharge,
    /// Heading to a pickup station.
    Pickup,
}

/// One vehicle's action for the current tick.
///
/// Produced by [`DispatchPolicy::decide`][crate::DispatchPolicy::decide]
/// and applied by the simulation loop, which owns all mutation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DispatchAction {
    /// Move one edge along the shortest path toward some target.
    Hop { to: StationId, purpose: HopPurpose },

    /// Start a charge cycle at the current (charging) station.
    StartCharge,

    /// Take the listed payloads aboard at the current station.
    ///
    /// The list is the pickup rule's candidate set; the loop re-checks
    /// capacity per payload as it attaches.
    PickUp { payloads: Vec<PayloadId> },

    /// Nothing applicable this tick.
    Hold,
}
