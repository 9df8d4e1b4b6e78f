//! Integration tests for agv-sim: the concrete scheduling scenarios.

#[cfg(test)]
mod helpers {
    use agv_core::{SimTime, StationId};
    use agv_fleet::{Payload, Priority};
    use agv_network::StationNetwork;

    use crate::{MoveRecord, RunOutcome, SimObserver};

    /// Two stations joined by a single weight-10 route.
    pub fn pair_network() -> StationNetwork {
        let mut net = StationNetwork::new(2);
        net.add_edge(StationId(1), StationId(2), 10.0);
        net
    }

    pub fn job(
        id: &str,
        source: u32,
        dest: u32,
        weight: f64,
        priority: Priority,
        dispatch: u32,
    ) -> Payload {
        Payload::new(
            id,
            StationId(source),
            StationId(dest),
            weight,
            priority,
            SimTime(dispatch),
        )
    }

    /// Observer that flattens every hook into a readable event string.
    #[derive(Default)]
    pub struct EventLog {
        pub events: Vec<String>,
    }

    impl SimObserver for EventLog {
        fn on_move(&mut self, record: &MoveRecord) {
            self.events.push(format!("move {record}"));
        }
        fn on_pickup(&mut self, agv: &str, payload: &str, now: SimTime) {
            self.events.push(format!("pickup {agv} {payload} {now}"));
        }
        fn on_delivery(&mut self, payload: &str, _priority: Priority, latency: u32, now: SimTime) {
            self.events.push(format!("deliver {payload} {latency} {now}"));
        }
        fn on_charge_start(&mut self, agv: &str, now: SimTime) {
            self.events.push(format!("charge_start {agv} {now}"));
        }
        fn on_charge_complete(&mut self, agv: &str, now: SimTime) {
            self.events.push(format!("charge_done {agv} {now}"));
        }
        fn on_deadlock(&mut self, now: SimTime) {
            self.events.push(format!("deadlock {now}"));
        }
        fn on_sim_end(&mut self, outcome: RunOutcome, now: SimTime) {
            self.events.push(format!("end {outcome:?} {now}"));
        }
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use agv_core::StationId;
    use agv_dispatch::PriorityLadder;
    use agv_fleet::{Agv, Fleet, Priority};

    use super::helpers::{job, pair_network};
    use crate::{SimBuilder, SimError};

    #[test]
    fn accepts_consistent_inputs() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let sim = SimBuilder::new(
            pair_network(),
            fleet,
            vec![job("p1", 1, 2, 3.0, Priority::Express, 0)],
            PriorityLadder,
        )
        .build();
        assert!(sim.is_ok());
    }

    #[test]
    fn rejects_vehicle_at_unknown_station() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(7)));
        let err = SimBuilder::new(pair_network(), fleet, vec![], PriorityLadder).build();
        assert!(matches!(err, Err(SimError::Config(msg)) if msg.contains("agv_1")));
    }

    #[test]
    fn rejects_payload_with_unknown_station() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let err = SimBuilder::new(
            pair_network(),
            fleet,
            vec![job("p1", 1, 9, 3.0, Priority::Express, 0)],
            PriorityLadder,
        )
        .build();
        assert!(matches!(err, Err(SimError::Config(msg)) if msg.contains("p1")));
    }
}

// ── Single-vehicle, single-payload ────────────────────────────────────────────

#[cfg(test)]
mod single_delivery {
    use agv_core::StationId;
    use agv_dispatch::PriorityLadder;
    use agv_fleet::{Agv, Fleet, Priority};

    use super::helpers::{job, pair_network, EventLog};
    use crate::{NoopObserver, RunOutcome, SimBuilder};

    #[test]
    fn delivers_and_reports_expected_numbers() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let mut sim = SimBuilder::new(
            pair_network(),
            fleet,
            vec![job("p1", 1, 2, 3.0, Priority::Express, 0)],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let mut log = EventLog::default();
        let outcome = sim.run(&mut log).unwrap();
        assert_eq!(outcome, RunOutcome::AllDelivered);

        // Exactly one hop: laden 1→2 at 08:00.  Travel is
        // ceil((5 + 3/10·5) · 10) = 65 minutes.
        assert_eq!(sim.move_log().len(), 1);
        assert_eq!(sim.move_log()[0].to_string(), "agv_1-1-2-08:00-3.0-p1");

        let metrics = sim.metrics();
        assert_eq!(metrics.makespan_minutes, 65);
        assert_eq!(metrics.delivered_count, 1);
        assert_eq!(metrics.avg_for(Priority::Express), 65.0);
        assert_eq!(metrics.avg_for(Priority::Standard), 0.0);
        assert_eq!(metrics.avg_for(Priority::Deferred), 0.0);
        assert_eq!(metrics.delivery_rate(), 100.0);

        // Pickup precedes the hop; delivery lands at 09:05.
        assert_eq!(
            log.events,
            vec![
                "pickup agv_1 p1 08:00",
                "move agv_1-1-2-08:00-3.0-p1",
                "deliver p1 65 09:05",
                "end AllDelivered 09:05",
            ]
        );
    }

    #[test]
    fn max_capacity_payload_carried_alone() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let mut sim = SimBuilder::new(
            pair_network(),
            fleet,
            vec![job("heavy", 1, 2, 10.0, Priority::Standard, 0)],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let outcome = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(outcome, RunOutcome::AllDelivered);
        // Full load: 10 min/unit over 10 units.
        assert_eq!(sim.metrics().makespan_minutes, 100);
    }
}

// ── Charging behavior ─────────────────────────────────────────────────────────

#[cfg(test)]
mod charging {
    use agv_core::StationId;
    use agv_dispatch::PriorityLadder;
    use agv_fleet::{Agv, Fleet, Priority};

    use super::helpers::{job, EventLog};
    use crate::{RunOutcome, SimBuilder};
    use agv_network::StationNetwork;

    #[test]
    fn low_battery_detour_then_service() {
        // 25% battery, nothing aboard: the vehicle detours to the charger
        // before the payload dispatches, charges to full, then delivers.
        let mut fleet = Fleet::new();
        fleet.register(Agv::with_battery("agv_1", StationId(5), 25.0));
        let mut sim = SimBuilder::new(
            StationNetwork::grid_default(),
            fleet,
            vec![job("p1", 5, 2, 3.0, Priority::Express, 180)],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let mut log = EventLog::default();
        let outcome = sim.run(&mut log).unwrap();
        assert_eq!(outcome, RunOutcome::AllDelivered);

        // First move heads for station 9, unladen.
        assert_eq!(sim.move_log()[0].to.0, 9);
        assert!(sim.move_log()[0].to_string().ends_with("-0.0-empty"));

        // One full charge cycle: 5→9 is 14 whole units = 70 min, then
        // 15 min on the charger.
        let metrics = sim.metrics();
        assert_eq!(metrics.charge_counts, vec![("agv_1".to_string(), 1)]);
        assert!(log.events.contains(&"charge_start agv_1 09:10".to_string()));
        assert!(log.events.contains(&"charge_done agv_1 09:25".to_string()));
    }

    #[test]
    fn charges_immediately_when_starting_at_charger() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::with_battery("agv_1", StationId(9), 50.0));
        let mut sim = SimBuilder::new(
            StationNetwork::grid_default(),
            fleet,
            vec![job("p1", 1, 2, 1.0, Priority::Express, 0)],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let mut log = EventLog::default();
        sim.run(&mut log).unwrap();
        // Tick 0, before anything else: start charging.
        assert_eq!(log.events[0], "charge_start agv_1 08:00");
        assert_eq!(sim.metrics().charge_counts[0].1, 1);
    }
}

// ── Deadlock ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod deadlock {
    use agv_core::StationId;
    use agv_dispatch::PriorityLadder;
    use agv_fleet::{Agv, Fleet, Priority};
    use agv_network::StationNetwork;

    use super::helpers::{job, EventLog};
    use crate::{RunOutcome, SimBuilder};

    #[test]
    fn unreachable_payload_terminates_cleanly() {
        // Station 2 is isolated: the only payload can never be picked up.
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let mut sim = SimBuilder::new(
            StationNetwork::new(2),
            fleet,
            vec![job("p1", 2, 1, 3.0, Priority::Express, 0)],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let mut log = EventLog::default();
        let outcome = sim.run(&mut log).unwrap();
        assert_eq!(outcome, RunOutcome::Deadlock);

        // Five idle ticks, each advancing by the 5-minute fallback; the
        // detector fires before a fifth advance.
        assert_eq!(sim.metrics().makespan_minutes, 20);
        assert_eq!(sim.metrics().delivered_count, 0);
        assert_eq!(sim.metrics().delivery_rate(), 0.0);
        assert!(sim.move_log().is_empty());
        assert!(!sim.payloads().is_delivered(agv_core::PayloadId(0)));
        assert!(log.events.iter().any(|e| e.starts_with("deadlock")));
    }

    #[test]
    fn partial_delivery_before_deadlock() {
        // Two payloads: one deliverable, one sourced at an isolated station.
        let mut net = StationNetwork::new(3);
        net.add_edge(StationId(1), StationId(2), 10.0);
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let mut sim = SimBuilder::new(
            net,
            fleet,
            vec![
                job("ok", 1, 2, 2.0, Priority::Express, 0),
                job("stuck", 3, 1, 2.0, Priority::Express, 0),
            ],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let mut log = EventLog::default();
        let outcome = sim.run(&mut log).unwrap();
        assert_eq!(outcome, RunOutcome::Deadlock);

        // The reachable payload was still delivered and counted.
        let metrics = sim.metrics();
        assert_eq!(metrics.delivered_count, 1);
        assert_eq!(metrics.total_payloads, 2);
        assert_eq!(metrics.delivery_rate(), 50.0);
        assert!(metrics.avg_for(Priority::Express) > 0.0);
    }
}

// ── Determinism and ordering ──────────────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use agv_core::StationId;
    use agv_dispatch::PriorityLadder;
    use agv_fleet::{Agv, Fleet, Priority};

    use super::helpers::{job, pair_network, EventLog};
    use crate::SimBuilder;

    #[test]
    fn first_registered_vehicle_claims_the_work() {
        // Both vehicles idle at the source; fleet order decides.
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        fleet.register(Agv::new("agv_2", StationId(1)));
        let mut sim = SimBuilder::new(
            pair_network(),
            fleet,
            vec![job("p1", 1, 2, 3.0, Priority::Express, 0)],
            PriorityLadder,
        )
        .build()
        .unwrap();

        let mut log = EventLog::default();
        sim.run(&mut log).unwrap();
        assert_eq!(log.events[0], "pickup agv_1 p1 08:00");
        // agv_2 never moved.
        assert!(sim.move_log().iter().all(|r| r.agv == "agv_1"));
    }

    #[test]
    fn identical_runs_produce_identical_logs() {
        let build = || {
            let mut fleet = Fleet::new();
            fleet.register(Agv::new("agv_1", StationId(1)));
            fleet.register(Agv::new("agv_2", StationId(3)));
            SimBuilder::new(
                agv_network::StationNetwork::grid_default(),
                fleet,
                vec![
                    job("a", 1, 6, 4.0, Priority::Standard, 0),
                    job("b", 2, 7, 2.5, Priority::Express, 10),
                    job("c", 4, 8, 6.0, Priority::Deferred, 30),
                ],
                PriorityLadder,
            )
            .build()
            .unwrap()
        };

        let mut first = build();
        let mut second = build();
        first.run(&mut crate::NoopObserver).unwrap();
        second.run(&mut crate::NoopObserver).unwrap();

        let lines = |sim: &crate::Sim<PriorityLadder>| {
            sim.move_log().iter().map(ToString::to_string).collect::<Vec<_>>()
        };
        assert_eq!(lines(&first), lines(&second));
        assert_eq!(first.metrics().makespan_minutes, second.metrics().makespan_minutes);
    }

    #[test]
    fn delivered_payloads_stay_delivered() {
        let mut fleet = Fleet::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        let mut sim = SimBuilder::new(
            pair_network(),
            fleet,
            vec![
                job("p1", 1, 2, 3.0, Priority::Express, 0),
                job("p2", 2, 1, 3.0, Priority::Standard, 0),
            ],
            PriorityLadder,
        )
        .build()
        .unwrap();

        sim.run(&mut crate::NoopObserver).unwrap();
        assert!(sim.payloads().all_delivered());
        assert_eq!(sim.metrics().delivered_count, 2);
    }
}
