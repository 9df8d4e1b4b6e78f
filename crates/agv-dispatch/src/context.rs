//! Read-only world view handed to dispatch policies.

use agv_core::{SimParams, SimTime};
use agv_fleet::{Fleet, PayloadRegistry};
use agv_network::StationNetwork;

/// Everything a policy may consult when deciding a vehicle's next action.
///
/// Borrowed immutably from the simulation for the duration of one decision;
/// the loop applies the chosen action after the borrow ends, so decisions
/// made earlier in the same tick are visible to later vehicles.
pub struct DispatchContext<'a> {
    /// The current simulation time.
    pub now: SimTime,

    /// Station graph; read-only during the run.
    pub network: &'a StationNetwork,

    /// All vehicles, in registration order.
    pub fleet: &'a Fleet,

    /// All payloads with their lifecycle state.
    pub payloads: &'a PayloadRegistry,

    /// Run parameters (charging station, deadlock tuning).
    pub params: &'a SimParams,
}
