//! The `Sim` struct and its tick loop.

use tracing::{debug, info, warn};

use agv_core::{AgvId, PayloadId, SimParams, SimTime};
use agv_dispatch::{DispatchAction, DispatchContext, DispatchPolicy, HopPurpose};
use agv_fleet::{AgvMode, Fleet, FleetError, PayloadRegistry};
use agv_network::StationNetwork;

use crate::metrics::MetricsRecorder;
use crate::movelog::MoveRecord;
use crate::observer::SimObserver;
use crate::SimResult;

// ── RunOutcome ────────────────────────────────────────────────────────────────

/// How a run ended.  Both variants are normal termination; deadlock is a
/// warning condition, not a failure.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RunOutcome {
    /// Every payload reached its destination.
    AllDelivered,
    /// The no-progress detector fired; undelivered payloads remain.
    Deadlock,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// Owns every piece of run state — network, fleet arena, payload registry,
/// clock, metrics, move log — and drives the three-phase tick loop
/// described at the [crate root](crate).  Create via
/// [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: DispatchPolicy> {
    pub(crate) network:  StationNetwork,
    pub(crate) fleet:    Fleet,
    pub(crate) payloads: PayloadRegistry,
    pub(crate) params:   SimParams,
    pub(crate) policy:   P,

    now:         SimTime,
    metrics:     MetricsRecorder,
    move_log:    Vec<MoveRecord>,
    stuck_ticks: u32,
    /// Per-vehicle flag so a stranded vehicle is warned about once, not
    /// every tick.
    stranded_warned: Vec<bool>,
}

impl<P: DispatchPolicy> Sim<P> {
    pub(crate) fn new(
        network: StationNetwork,
        fleet: Fleet,
        payloads: PayloadRegistry,
        params: SimParams,
        policy: P,
    ) -> Self {
        let fleet_len = fleet.len();
        Self {
            network,
            fleet,
            payloads,
            params,
            policy,
            now: SimTime::ZERO,
            metrics: MetricsRecorder::new(),
            move_log: Vec::new(),
            stuck_ticks: 0,
            stranded_warned: vec![false; fleet_len],
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn network(&self) -> &StationNetwork {
        &self.network
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn payloads(&self) -> &PayloadRegistry {
        &self.payloads
    }

    /// The execution log accumulated so far, in emission order.
    pub fn move_log(&self) -> &[MoveRecord] {
        &self.move_log
    }

    /// Summary metrics for the run so far.
    pub fn metrics(&self) -> crate::SimMetrics {
        self.metrics.summary(&self.fleet, self.payloads.len())
    }

    // ── Main loop ─────────────────────────────────────────────────────────

    /// Run until every payload is delivered or the deadlock detector fires.
    ///
    /// The clock never advances while progress is being made at the current
    /// time, so simultaneous events all land on the same timestamp.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunOutcome> {
        info!(
            agvs = self.fleet.len(),
            payloads = self.payloads.len(),
            "starting simulation at {}",
            self.now
        );

        let outcome = loop {
            if self.payloads.all_delivered() {
                info!("all payloads delivered at {}", self.now);
                break RunOutcome::AllDelivered;
            }

            let progress_a = self.complete_due(observer)?;
            let progress_b = self.assign_idle(observer)?;

            #[cfg(debug_assertions)]
            self.assert_invariants();

            if progress_a || progress_b {
                self.stuck_ticks = 0;
                continue;
            }

            self.stuck_ticks += 1;
            if self.stuck_ticks >= self.params.max_stuck_ticks {
                warn!(
                    undelivered = self.payloads.len() - self.payloads.delivered_count(),
                    "no progress for {} ticks — declaring deadlock at {}",
                    self.stuck_ticks,
                    self.now
                );
                observer.on_deadlock(self.now);
                break RunOutcome::Deadlock;
            }

            self.advance_clock(observer);
        };

        self.metrics.record_end(self.now);
        observer.on_sim_end(outcome, self.now);
        Ok(outcome)
    }

    // ── Phase A: completions ──────────────────────────────────────────────

    /// Finish every segment and charge whose `busy_until` has passed, in
    /// fleet order.  Arrivals detach payloads destined for the new station
    /// and record their latencies.
    fn complete_due<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let now = self.now;
        let mut progress = false;

        for idx in 0..self.fleet.len() {
            let agv_id = AgvId(idx as u32);
            let agv = self.fleet.get_mut(agv_id);
            if agv.is_idle() || now < agv.busy_until() {
                continue;
            }

            match agv.mode() {
                AgvMode::Moving => {
                    let station = agv.complete_move(now)?;
                    debug!(agv = agv.id(), station = %station, "arrived");

                    let due: Vec<PayloadId> = agv
                        .held()
                        .iter()
                        .map(|c| c.payload)
                        .filter(|&p| self.payloads.get(p).destination() == station)
                        .collect();

                    for payload_id in due {
                        agv.detach(payload_id)?;
                        let picked_up = self
                            .payloads
                            .picked_up_at(payload_id)
                            .unwrap_or(self.payloads.get(payload_id).dispatch_time());
                        self.payloads.mark_delivered(payload_id);

                        let payload = self.payloads.get(payload_id);
                        let latency = now.since(picked_up);

                        self.metrics.record_delivery(payload.priority(), latency);
                        observer.on_delivery(payload.id(), payload.priority(), latency, now);
                        info!(
                            agv = agv.id(),
                            payload = payload.id(),
                            station = %station,
                            latency_min = latency,
                            "delivered"
                        );
                    }
                    progress = true;
                }
                AgvMode::Charging => {
                    agv.complete_charge(now)?;
                    let agv = self.fleet.get(agv_id);
                    observer.on_charge_complete(agv.id(), now);
                    info!(agv = agv.id(), "charge complete");
                    progress = true;
                }
                AgvMode::Idle => unreachable!("idle vehicles are skipped above"),
            }
        }

        Ok(progress)
    }

    // ── Phase B: assignments ──────────────────────────────────────────────

    /// Ask the policy for one action per idle vehicle, in fleet order, and
    /// apply it immediately so later vehicles see the consequences.
    fn assign_idle<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let mut progress = false;

        for idx in 0..self.fleet.len() {
            let agv_id = AgvId(idx as u32);
            if !self.fleet.get(agv_id).is_idle() {
                continue;
            }

            let action = {
                let ctx = DispatchContext {
                    now:      self.now,
                    network:  &self.network,
                    fleet:    &self.fleet,
                    payloads: &self.payloads,
                    params:   &self.params,
                };
                self.policy.decide(agv_id, &ctx)
            };

            match action {
                DispatchAction::Hop { to, purpose } => {
                    self.apply_hop(agv_id, to, purpose, observer)?;
                    progress = true;
                }
                DispatchAction::StartCharge => {
                    let now = self.now;
                    let agv = self.fleet.get_mut(agv_id);
                    agv.start_charge(now)?;
                    observer.on_charge_start(agv.id(), now);
                    info!(agv = agv.id(), battery = agv.battery(), "charging");
                    progress = true;
                }
                DispatchAction::PickUp { payloads } => {
                    progress |= self.apply_pickup(agv_id, &payloads, observer)?;
                }
                DispatchAction::Hold => self.note_if_stranded(agv_id),
            }
        }

        Ok(progress)
    }

    /// Initiate a single-edge hop, emitting exactly one move record.
    fn apply_hop<O: SimObserver>(
        &mut self,
        agv_id: AgvId,
        to: agv_core::StationId,
        purpose: HopPurpose,
        observer: &mut O,
    ) -> SimResult<()> {
        let agv = self.fleet.get(agv_id);
        let from = agv.station();
        // `to` lies on a shortest path from `from`, so the pair's shortest
        // distance is exactly the connecting edge's weight.
        let distance = self.network.distance(from, to);

        let record = MoveRecord {
            agv:         agv.id().to_string(),
            from,
            to,
            departed_at: self.now,
            load:        agv.load(),
            payloads:    agv
                .held()
                .iter()
                .map(|c| self.payloads.get(c.payload).id().to_string())
                .collect(),
        };

        let now = self.now;
        let minutes = self.fleet.get_mut(agv_id).start_move(to, distance, now)?;
        info!(
            agv = %record.agv,
            from = %from,
            to = %to,
            minutes,
            ?purpose,
            "hop"
        );

        observer.on_move(&record);
        self.move_log.push(record);
        Ok(())
    }

    /// Attach the pickup rule's candidate set, re-checking capacity per
    /// payload.  A rejected payload is a contained policy defect: warn and
    /// leave it available.
    fn apply_pickup<O: SimObserver>(
        &mut self,
        agv_id: AgvId,
        payloads: &[PayloadId],
        observer: &mut O,
    ) -> SimResult<bool> {
        let now = self.now;
        let mut any = false;

        for &payload_id in payloads {
            let payload = self.payloads.get(payload_id);
            let weight = payload.weight();

            match self.fleet.get_mut(agv_id).attach(payload_id, weight) {
                Ok(()) => {
                    self.payloads.mark_picked_up(payload_id, agv_id, now);
                    let agv = self.fleet.get(agv_id);
                    observer.on_pickup(agv.id(), self.payloads.get(payload_id).id(), now);
                    info!(
                        agv = agv.id(),
                        payload = self.payloads.get(payload_id).id(),
                        station = %agv.station(),
                        "picked up"
                    );
                    any = true;
                }
                Err(err @ FleetError::CapacityOverflow { .. }) => {
                    warn!(%err, "pickup rejected");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(any)
    }

    /// Log (once) a vehicle that ran flat away from the charger.
    fn note_if_stranded(&mut self, agv_id: AgvId) {
        let agv = self.fleet.get(agv_id);
        if agv.battery() <= 0.0
            && agv.station() != self.params.charging_station
            && !self.stranded_warned[agv_id.index()]
        {
            self.stranded_warned[agv_id.index()] = true;
            warn!(
                agv = agv.id(),
                station = %agv.station(),
                "battery exhausted away from charger — vehicle is stranded"
            );
        }
    }

    // ── Phase C: clock ────────────────────────────────────────────────────

    /// Jump to the next event: the earliest `busy_until` among busy
    /// vehicles or the next dispatch time, whichever comes first.  With no
    /// event in sight, fall forward by the configured fixed step.
    fn advance_clock<O: SimObserver>(&mut self, observer: &mut O) {
        let next_completion = self
            .fleet
            .iter()
            .filter(|agv| !agv.is_idle())
            .map(|agv| agv.busy_until())
            .min();
        let next_dispatch = self.payloads.next_dispatch_after(self.now);

        self.now = [next_completion, next_dispatch]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(self.now + self.params.fallback_advance_min);

        debug!("clock advanced to {}", self.now);
        observer.on_clock_advance(self.now);
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Tick-boundary invariants, compiled out of release builds.
    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        use agv_core::params::MAX_CAPACITY;

        for agv_id in self.fleet.ids() {
            let agv = self.fleet.get(agv_id);

            assert!(
                agv.load() <= MAX_CAPACITY + 1e-9,
                "{} overloaded: {}",
                agv.id(),
                agv.load()
            );
            assert!(
                (0.0..=100.0).contains(&agv.battery()),
                "{} battery out of range: {}",
                agv.id(),
                agv.battery()
            );
            if agv.mode() == AgvMode::Charging {
                assert_eq!(
                    agv.station(),
                    self.params.charging_station,
                    "{} charging away from the charger",
                    agv.id()
                );
            }
            if agv.is_idle() {
                assert!(self.now >= agv.busy_until(), "{} idle while busy", agv.id());
                assert_eq!(agv.station(), agv.destination());
            }

            for carried in agv.held() {
                assert_eq!(
                    self.payloads.holder(carried.payload),
                    Some(agv_id),
                    "registry holder out of sync for payload {}",
                    carried.payload
                );
                assert!(
                    !self.payloads.is_delivered(carried.payload),
                    "delivered payload {} still aboard {}",
                    carried.payload,
                    agv.id()
                );
            }
        }
    }
}
