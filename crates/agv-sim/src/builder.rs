//! Fluent builder for constructing a [`Sim`].

use agv_core::SimParams;
use agv_dispatch::DispatchPolicy;
use agv_fleet::{Fleet, Payload, PayloadRegistry};
use agv_network::StationNetwork;

use crate::{Sim, SimError, SimResult};

/// Builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - the [`StationNetwork`] to route over,
/// - a [`Fleet`] (registration order becomes scheduling order),
/// - the validated payload list (see `agv_fleet::load_payloads_csv`),
/// - a `P: DispatchPolicy` (the shipped one is
///   [`PriorityLadder`][agv_dispatch::PriorityLadder]).
///
/// # Optional inputs
///
/// | Method       | Default                |
/// |--------------|------------------------|
/// | `.params(p)` | `SimParams::default()` |
///
/// `build` checks structural consistency — every vehicle and payload
/// station must exist in the network — so the loop itself never meets a
/// dangling id.  Payload-level validation (weights, priorities, duplicate
/// ids) belongs to the input loader, which runs before this.
pub struct SimBuilder<P: DispatchPolicy> {
    network:  StationNetwork,
    fleet:    Fleet,
    payloads: Vec<Payload>,
    policy:   P,
    params:   SimParams,
}

impl<P: DispatchPolicy> SimBuilder<P> {
    pub fn new(network: StationNetwork, fleet: Fleet, payloads: Vec<Payload>, policy: P) -> Self {
        Self {
            network,
            fleet,
            payloads,
            policy,
            params: SimParams::default(),
        }
    }

    /// Override the run parameters (charging station, deadlock tuning).
    pub fn params(mut self, params: SimParams) -> Self {
        self.params = params;
        self
    }

    /// Validate inputs and produce a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P>> {
        for agv in self.fleet.iter() {
            if !self.network.contains(agv.station()) {
                return Err(SimError::Config(format!(
                    "vehicle {} starts at unknown station {}",
                    agv.id(),
                    agv.station()
                )));
            }
        }

        for payload in &self.payloads {
            for station in [payload.source(), payload.destination()] {
                if !self.network.contains(station) {
                    return Err(SimError::Config(format!(
                        "payload {} references unknown station {}",
                        payload.id(),
                        station
                    )));
                }
            }
        }

        Ok(Sim::new(
            self.network,
            self.fleet,
            PayloadRegistry::new(self.payloads),
            self.params,
            self.policy,
        ))
    }
}
