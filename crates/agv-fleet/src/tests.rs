//! Unit tests for agv-fleet.

// ── Travel math ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod travel {
    use crate::agv::travel_minutes;

    #[test]
    fn empty_vehicle_rate() {
        // 5 min/unit unladen.
        assert_eq!(travel_minutes(0.0, 10.0), 50);
        assert_eq!(travel_minutes(0.0, 1.0), 5);
    }

    #[test]
    fn full_vehicle_rate() {
        // 10 min/unit at capacity.
        assert_eq!(travel_minutes(10.0, 10.0), 100);
    }

    #[test]
    fn interpolated_rate_rounds_up() {
        // load 3 → 6.5 min/unit; 6.5 * 10 = 65 exactly.
        assert_eq!(travel_minutes(3.0, 10.0), 65);
        // 6.5 * 3 = 19.5 → 20.
        assert_eq!(travel_minutes(3.0, 3.0), 20);
    }

    #[test]
    fn distance_truncates_to_whole_units() {
        // 14.142 floors to 14 units.
        assert_eq!(travel_minutes(0.0, 14.142), 70);
        // Sub-unit segments take no time at all.
        assert_eq!(travel_minutes(5.0, 0.9), 0);
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod state_machine {
    use agv_core::params::FULL_BATTERY;
    use agv_core::{PayloadId, SimTime, StationId};

    use crate::{Agv, AgvMode, FleetError};

    #[test]
    fn new_vehicle_is_idle_and_full() {
        let agv = Agv::new("agv_1", StationId(1));
        assert_eq!(agv.mode(), AgvMode::Idle);
        assert_eq!(agv.battery(), FULL_BATTERY);
        assert_eq!(agv.station(), StationId(1));
        assert_eq!(agv.destination(), StationId(1));
        assert_eq!(agv.load(), 0.0);
    }

    #[test]
    fn move_holds_station_until_completion() {
        let mut agv = Agv::new("agv_1", StationId(1));
        let minutes = agv.start_move(StationId(2), 10.0, SimTime::ZERO).unwrap();
        assert_eq!(minutes, 50);
        assert_eq!(agv.mode(), AgvMode::Moving);
        assert_eq!(agv.station(), StationId(1), "station changes only on arrival");
        assert_eq!(agv.destination(), StationId(2));
        assert_eq!(agv.busy_until(), SimTime(50));

        let arrived = agv.complete_move(SimTime(50)).unwrap();
        assert_eq!(arrived, StationId(2));
        assert_eq!(agv.station(), StationId(2));
        assert!(agv.is_idle());
    }

    #[test]
    fn complete_move_before_busy_until_rejected() {
        let mut agv = Agv::new("agv_1", StationId(1));
        agv.start_move(StationId(2), 10.0, SimTime::ZERO).unwrap();
        assert!(matches!(
            agv.complete_move(SimTime(49)),
            Err(FleetError::StillBusy { .. })
        ));
    }

    #[test]
    fn cannot_start_move_while_moving() {
        let mut agv = Agv::new("agv_1", StationId(1));
        agv.start_move(StationId(2), 10.0, SimTime::ZERO).unwrap();
        assert!(matches!(
            agv.start_move(StationId(3), 10.0, SimTime::ZERO),
            Err(FleetError::NotIdle { .. })
        ));
    }

    #[test]
    fn battery_drains_at_move_start() {
        let mut agv = Agv::new("agv_1", StationId(1));
        agv.start_move(StationId(2), 10.0, SimTime::ZERO).unwrap();
        // 50 min unladen: (100/45) · 1.0 · 50 / 10 ≈ 11.11 points.
        let expected = 100.0 - (100.0 / 45.0) * 50.0 / 10.0;
        assert!((agv.battery() - expected).abs() < 1e-9, "got {}", agv.battery());
    }

    #[test]
    fn drain_clamped_per_segment() {
        let mut agv = Agv::new("agv_1", StationId(1));
        for i in 0..5 {
            agv.attach(PayloadId(i), 2.0).unwrap();
        }
        // Full load over 30 units: 300 min, unclamped drain would be
        // (100/45) · 2 · 30 = 133; the cap keeps it at 30 points.
        agv.start_move(StationId(2), 30.0, SimTime::ZERO).unwrap();
        assert!((agv.battery() - 70.0).abs() < 1e-9, "got {}", agv.battery());
    }

    #[test]
    fn battery_never_goes_negative() {
        let mut agv = Agv::with_battery("agv_1", StationId(1), 5.0);
        // Drain exceeds the remaining 5 points; the move still starts.
        agv.start_move(StationId(2), 40.0, SimTime::ZERO).unwrap();
        assert_eq!(agv.battery(), 0.0);
        // It completes, but no further segment can start.
        agv.complete_move(agv.busy_until()).unwrap();
        assert!(matches!(
            agv.start_move(StationId(1), 10.0, agv.busy_until()),
            Err(FleetError::BatteryEmpty { .. })
        ));
    }

    #[test]
    fn charge_cycle() {
        let mut agv = Agv::with_battery("agv_1", StationId(9), 40.0);
        agv.start_charge(SimTime(100)).unwrap();
        assert_eq!(agv.mode(), AgvMode::Charging);
        assert_eq!(agv.busy_until(), SimTime(115));
        assert_eq!(agv.charge_count(), 1);

        agv.complete_charge(SimTime(115)).unwrap();
        assert!(agv.is_idle());
        assert_eq!(agv.battery(), 100.0);
    }

    #[test]
    fn full_battery_refuses_charge() {
        let mut agv = Agv::new("agv_1", StationId(9));
        assert!(matches!(agv.start_charge(SimTime::ZERO), Err(FleetError::BatteryFull { .. })));
    }
}

// ── Carrying ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod carrying {
    use agv_core::{PayloadId, StationId};

    use crate::{Agv, FleetError};

    #[test]
    fn load_is_sum_of_held_weights() {
        let mut agv = Agv::new("agv_1", StationId(1));
        agv.attach(PayloadId(0), 3.0).unwrap();
        agv.attach(PayloadId(1), 2.5).unwrap();
        assert_eq!(agv.load(), 5.5);

        agv.detach(PayloadId(0)).unwrap();
        assert_eq!(agv.load(), 2.5);
        assert_eq!(agv.held().len(), 1);
    }

    #[test]
    fn max_capacity_payload_fits_alone() {
        let mut agv = Agv::new("agv_1", StationId(1));
        agv.attach(PayloadId(0), 10.0).unwrap();
        assert_eq!(agv.load(), 10.0);
    }

    #[test]
    fn overflow_rejected() {
        let mut agv = Agv::new("agv_1", StationId(1));
        agv.attach(PayloadId(0), 6.0).unwrap();
        let err = agv.attach(PayloadId(1), 5.0);
        assert!(matches!(err, Err(FleetError::CapacityOverflow { .. })));
        // The rejected attach left state untouched.
        assert_eq!(agv.load(), 6.0);
        assert_eq!(agv.held().len(), 1);
    }

    #[test]
    fn detach_unheld_rejected() {
        let mut agv = Agv::new("agv_1", StationId(1));
        assert!(matches!(
            agv.detach(PayloadId(7)),
            Err(FleetError::NotHeld { .. })
        ));
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use agv_core::{AgvId, PayloadId, SimTime, StationId};

    use crate::{Payload, PayloadRegistry, Priority};

    fn payload(id: &str, priority: Priority, dispatch: u32) -> Payload {
        Payload::new(id, StationId(1), StationId(2), 1.0, priority, SimTime(dispatch))
    }

    #[test]
    fn sorted_by_priority_then_dispatch() {
        let registry = PayloadRegistry::new(vec![
            payload("late_express", Priority::Express, 30),
            payload("deferred", Priority::Deferred, 0),
            payload("early_express", Priority::Express, 5),
            payload("standard", Priority::Standard, 0),
        ]);
        let order: Vec<&str> = registry.ids().map(|id| registry.get(id).id()).collect();
        assert_eq!(order, vec!["early_express", "late_express", "standard", "deferred"]);
    }

    #[test]
    fn availability_respects_dispatch_time() {
        let registry = PayloadRegistry::new(vec![
            payload("now", Priority::Express, 0),
            payload("later", Priority::Express, 45),
        ]);
        let at_start: Vec<_> = registry.available_at(SimTime::ZERO).collect();
        assert_eq!(at_start.len(), 1);
        assert_eq!(registry.get(at_start[0]).id(), "now");

        let at_45: Vec<_> = registry.available_at(SimTime(45)).collect();
        assert_eq!(at_45.len(), 2);
    }

    #[test]
    fn held_and_delivered_not_available() {
        let mut registry = PayloadRegistry::new(vec![
            payload("a", Priority::Express, 0),
            payload("b", Priority::Express, 0),
        ]);
        registry.mark_picked_up(PayloadId(0), AgvId(0), SimTime::ZERO);
        assert_eq!(registry.available_at(SimTime(10)).count(), 1);

        registry.mark_delivered(PayloadId(0));
        assert_eq!(registry.available_at(SimTime(10)).count(), 1);
        assert!(registry.holder(PayloadId(0)).is_none());
        assert!(registry.is_delivered(PayloadId(0)));
        assert_eq!(registry.delivered_count(), 1);
        assert!(!registry.all_delivered());
    }

    #[test]
    fn next_dispatch_skips_past_and_delivered() {
        let mut registry = PayloadRegistry::new(vec![
            payload("a", Priority::Express, 0),
            payload("b", Priority::Standard, 20),
            payload("c", Priority::Deferred, 50),
        ]);
        assert_eq!(registry.next_dispatch_after(SimTime::ZERO), Some(SimTime(20)));
        assert_eq!(registry.next_dispatch_after(SimTime(20)), Some(SimTime(50)));
        assert_eq!(registry.next_dispatch_after(SimTime(50)), None);

        // Delivering "c" removes its dispatch event.
        registry.mark_picked_up(PayloadId(2), AgvId(0), SimTime(50));
        registry.mark_delivered(PayloadId(2));
        assert_eq!(registry.next_dispatch_after(SimTime(20)), None);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use agv_core::{SimTime, StationId};

    use crate::{load_payloads_reader, LoadError, Priority};

    const HEADER: &str = "id,source,destination,weight,priority,dispatch_time\n";

    fn load(rows: &str) -> Result<Vec<crate::Payload>, LoadError> {
        load_payloads_reader(Cursor::new(format!("{HEADER}{rows}")), 9)
    }

    #[test]
    fn parses_valid_rows() {
        let payloads = load("payload_1,1,5,3.0,1,08:01\npayload_2,2,8,6.5,3,9:30\n").unwrap();
        assert_eq!(payloads.len(), 2);

        let p1 = &payloads[0];
        assert_eq!(p1.id(), "payload_1");
        assert_eq!(p1.source(), StationId(1));
        assert_eq!(p1.destination(), StationId(5));
        assert_eq!(p1.weight(), 3.0);
        assert_eq!(p1.priority(), Priority::Express);
        assert_eq!(p1.dispatch_time(), SimTime(1));

        // Single-digit hour accepted.
        assert_eq!(payloads[1].dispatch_time(), SimTime(90));
    }

    #[test]
    fn pre_shift_dispatch_clamps() {
        let payloads = load("early,1,2,1.0,2,06:15\n").unwrap();
        assert_eq!(payloads[0].dispatch_time(), SimTime::ZERO);
    }

    #[test]
    fn duplicate_id_rejected() {
        let err = load("p,1,2,1.0,1,08:00\np,3,4,1.0,1,08:00\n");
        assert!(matches!(err, Err(LoadError::DuplicateId(id)) if id == "p"));
    }

    #[test]
    fn unknown_station_rejected() {
        let err = load("p,1,12,1.0,1,08:00\n");
        assert!(matches!(err, Err(LoadError::UnknownStation { station: 12, .. })));
        let err = load("p,0,2,1.0,1,08:00\n");
        assert!(matches!(err, Err(LoadError::UnknownStation { station: 0, .. })));
    }

    #[test]
    fn weight_bounds_enforced() {
        assert!(matches!(
            load("p,1,2,0.0,1,08:00\n"),
            Err(LoadError::WeightOutOfRange { .. })
        ));
        assert!(matches!(
            load("p,1,2,10.5,1,08:00\n"),
            Err(LoadError::WeightOutOfRange { .. })
        ));
        // Exactly MAX_CAPACITY is legal.
        assert!(load("p,1,2,10.0,1,08:00\n").is_ok());
    }

    #[test]
    fn priority_range_enforced() {
        assert!(matches!(
            load("p,1,2,1.0,4,08:00\n"),
            Err(LoadError::BadPriority { code: 4, .. })
        ));
        assert!(matches!(
            load("p,1,2,1.0,0,08:00\n"),
            Err(LoadError::BadPriority { code: 0, .. })
        ));
    }

    #[test]
    fn same_source_destination_rejected() {
        assert!(matches!(
            load("p,5,5,1.0,1,08:00\n"),
            Err(LoadError::SameSourceDestination { station: 5, .. })
        ));
    }

    #[test]
    fn malformed_time_rejected() {
        assert!(matches!(load("p,1,2,1.0,1,0830\n"), Err(LoadError::BadTime { .. })));
        assert!(matches!(load("p,1,2,1.0,1,25:00\n"), Err(LoadError::BadTime { .. })));
        assert!(matches!(load("p,1,2,1.0,1,08:61\n"), Err(LoadError::BadTime { .. })));
        assert!(matches!(load("p,1,2,1.0,1,8:5\n"), Err(LoadError::BadTime { .. })));
    }
}
