//! Per-vehicle state machine and the fleet arena.
//!
//! # States
//!
//! A vehicle is `Idle`, `Moving`, or `Charging`.  `Moving` and `Charging`
//! end when the simulation clock reaches `busy_until` and the scheduler
//! calls the matching `complete_*` transition; every other mutation
//! requires `Idle`.
//!
//! # Travel time and battery
//!
//! Per-unit travel minutes interpolate linearly between the empty and
//! full-load rates; the segment's real-valued distance is truncated to
//! whole units before the multiply, and the result rounds up to whole
//! minutes.  Battery drain scales with the same travel time and a load
//! factor in `[1, 2]`, clamped to at most `MAX_DRAIN_PER_MOVE` per segment
//! and floored at zero.

use agv_core::params::{
    CHARGE_DURATION_MIN, DISCHARGE_REFERENCE_MIN, EMPTY_TRAVEL_MIN_PER_UNIT, FULL_BATTERY,
    FULL_TRAVEL_MIN_PER_UNIT, MAX_CAPACITY, MAX_DRAIN_PER_MOVE,
};
use agv_core::{AgvId, PayloadId, SimTime, StationId};

use crate::FleetError;

// ── Travel math ───────────────────────────────────────────────────────────────

/// Whole minutes needed to traverse `distance` units carrying `load`.
///
/// `distance` is truncated to whole units; the per-unit rate is
/// `5 + (load / 10) · 5` minutes and the product rounds up.
pub fn travel_minutes(load: f64, distance: f64) -> u32 {
    let units = distance.floor();
    let spread = (FULL_TRAVEL_MIN_PER_UNIT - EMPTY_TRAVEL_MIN_PER_UNIT) as f64;
    let per_unit = EMPTY_TRAVEL_MIN_PER_UNIT as f64 + (load / MAX_CAPACITY) * spread;
    (per_unit * units).ceil() as u32
}

/// Battery points drained by a segment of `minutes` carrying `load`.
fn battery_drain(load: f64, minutes: u32) -> f64 {
    let per_unit = FULL_BATTERY / DISCHARGE_REFERENCE_MIN as f64;
    let load_factor = 1.0 + load / MAX_CAPACITY;
    let used = per_unit * load_factor * minutes as f64 / FULL_TRAVEL_MIN_PER_UNIT as f64;
    used.min(MAX_DRAIN_PER_MOVE)
}

// ── AgvMode ───────────────────────────────────────────────────────────────────

/// What a vehicle is currently doing.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgvMode {
    #[default]
    Idle,
    Moving,
    Charging,
}

// ── CarriedPayload ────────────────────────────────────────────────────────────

/// One payload aboard a vehicle.  Carrying the weight here keeps the load
/// invariant (`load == Σ held weights`) true by construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CarriedPayload {
    pub payload: PayloadId,
    pub weight:  f64,
}

// ── Agv ───────────────────────────────────────────────────────────────────────

/// A single vehicle.
///
/// `station` only changes in [`complete_move`](Self::complete_move): while
/// `Moving`, the vehicle is logically still at its departure station and
/// `destination` names where it is headed.  When idle,
/// `destination == station`.
#[derive(Clone, Debug)]
pub struct Agv {
    id:           String,
    station:      StationId,
    destination:  StationId,
    battery:      f64,
    held:         Vec<CarriedPayload>,
    busy_until:   SimTime,
    mode:         AgvMode,
    charge_count: u32,
}

impl Agv {
    /// A fully charged vehicle idle at `station`.
    pub fn new(id: impl Into<String>, station: StationId) -> Self {
        Self::with_battery(id, station, FULL_BATTERY)
    }

    /// A vehicle idle at `station` with the given battery level.
    pub fn with_battery(id: impl Into<String>, station: StationId, battery: f64) -> Self {
        Self {
            id: id.into(),
            station,
            destination: station,
            battery,
            held: Vec::new(),
            busy_until: SimTime::ZERO,
            mode: AgvMode::Idle,
            charge_count: 0,
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn station(&self) -> StationId {
        self.station
    }

    /// Target of the current segment; equals `station` when not moving.
    pub fn destination(&self) -> StationId {
        self.destination
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn busy_until(&self) -> SimTime {
        self.busy_until
    }

    pub fn mode(&self) -> AgvMode {
        self.mode
    }

    pub fn charge_count(&self) -> u32 {
        self.charge_count
    }

    pub fn held(&self) -> &[CarriedPayload] {
        &self.held
    }

    /// Total weight currently aboard.
    pub fn load(&self) -> f64 {
        self.held.iter().map(|c| c.weight).sum()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.mode == AgvMode::Idle
    }

    /// `true` if `weight` more would still fit.
    pub fn can_carry(&self, weight: f64) -> bool {
        self.load() + weight <= MAX_CAPACITY
    }

    /// Minutes this vehicle needs for a segment of `distance` units at its
    /// current load.
    pub fn travel_time(&self, distance: f64) -> u32 {
        travel_minutes(self.load(), distance)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Begin a segment to `to` of real-valued length `distance`.
    ///
    /// Battery is debited immediately; `station` is untouched until
    /// [`complete_move`](Self::complete_move).  Returns the segment's travel
    /// time in minutes.
    ///
    /// # Errors
    ///
    /// `NotIdle` unless idle; `BatteryEmpty` when the battery is flat — a
    /// stranded vehicle cannot start another segment.
    pub fn start_move(&mut self, to: StationId, distance: f64, now: SimTime) -> Result<u32, FleetError> {
        if !self.is_idle() {
            return Err(FleetError::NotIdle { agv: self.id.clone() });
        }
        if self.battery <= 0.0 {
            return Err(FleetError::BatteryEmpty { agv: self.id.clone() });
        }

        let minutes = self.travel_time(distance);
        self.battery = (self.battery - battery_drain(self.load(), minutes)).max(0.0);
        self.mode = AgvMode::Moving;
        self.destination = to;
        self.busy_until = now + minutes;
        Ok(minutes)
    }

    /// Arrive at the current segment's destination.
    ///
    /// # Errors
    ///
    /// `NotMoving` unless a segment is underway; `StillBusy` before
    /// `busy_until`.
    pub fn complete_move(&mut self, now: SimTime) -> Result<StationId, FleetError> {
        if self.mode != AgvMode::Moving {
            return Err(FleetError::NotMoving { agv: self.id.clone() });
        }
        if now < self.busy_until {
            return Err(FleetError::StillBusy { agv: self.id.clone(), busy_until: self.busy_until });
        }
        self.station = self.destination;
        self.mode = AgvMode::Idle;
        Ok(self.station)
    }

    /// Begin a charge cycle.  The caller guarantees the vehicle is parked at
    /// the charging station.
    ///
    /// # Errors
    ///
    /// `NotIdle` unless idle; `BatteryFull` at 100%.
    pub fn start_charge(&mut self, now: SimTime) -> Result<(), FleetError> {
        if !self.is_idle() {
            return Err(FleetError::NotIdle { agv: self.id.clone() });
        }
        if self.battery >= FULL_BATTERY {
            return Err(FleetError::BatteryFull { agv: self.id.clone() });
        }
        self.mode = AgvMode::Charging;
        self.busy_until = now + CHARGE_DURATION_MIN;
        self.charge_count += 1;
        Ok(())
    }

    /// Finish charging: battery snaps to exactly 100%.
    ///
    /// # Errors
    ///
    /// `NotCharging` unless a charge is underway; `StillBusy` before
    /// `busy_until`.
    pub fn complete_charge(&mut self, now: SimTime) -> Result<(), FleetError> {
        if self.mode != AgvMode::Charging {
            return Err(FleetError::NotCharging { agv: self.id.clone() });
        }
        if now < self.busy_until {
            return Err(FleetError::StillBusy { agv: self.id.clone(), busy_until: self.busy_until });
        }
        self.battery = FULL_BATTERY;
        self.mode = AgvMode::Idle;
        Ok(())
    }

    /// Take `payload` aboard.
    ///
    /// # Errors
    ///
    /// `NotIdle` unless idle; `CapacityOverflow` if the payload would push
    /// the load past capacity.  The dispatch policy never admits such a
    /// payload, so an overflow here is a scheduler defect being contained.
    pub fn attach(&mut self, payload: PayloadId, weight: f64) -> Result<(), FleetError> {
        if !self.is_idle() {
            return Err(FleetError::NotIdle { agv: self.id.clone() });
        }
        if !self.can_carry(weight) {
            return Err(FleetError::CapacityOverflow {
                agv: self.id.clone(),
                payload,
                load: self.load(),
                weight,
            });
        }
        debug_assert!(
            !self.held.iter().any(|c| c.payload == payload),
            "payload {payload} attached twice"
        );
        self.held.push(CarriedPayload { payload, weight });
        Ok(())
    }

    /// Put `payload` down at the current station.
    ///
    /// # Errors
    ///
    /// `NotHeld` if the payload is not aboard.
    pub fn detach(&mut self, payload: PayloadId) -> Result<(), FleetError> {
        match self.held.iter().position(|c| c.payload == payload) {
            Some(i) => {
                self.held.remove(i);
                Ok(())
            }
            None => Err(FleetError::NotHeld { agv: self.id.clone(), payload }),
        }
    }
}

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// The vehicle arena.  Registration order is the scheduler's iteration
/// order, so it must be stable for runs to be reproducible.
#[derive(Default)]
pub struct Fleet {
    agvs: Vec<Agv>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference fleet: `agv_1`..`agv_3` at stations 1, 3 and 7, fully
    /// charged.
    pub fn default_trio() -> Self {
        let mut fleet = Self::new();
        fleet.register(Agv::new("agv_1", StationId(1)));
        fleet.register(Agv::new("agv_2", StationId(3)));
        fleet.register(Agv::new("agv_3", StationId(7)));
        fleet
    }

    /// Add a vehicle and return its arena id.
    pub fn register(&mut self, agv: Agv) -> AgvId {
        let id = AgvId(self.agvs.len() as u32);
        self.agvs.push(agv);
        id
    }

    pub fn len(&self) -> usize {
        self.agvs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agvs.is_empty()
    }

    /// Iterator over all arena ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = AgvId> {
        (0..self.agvs.len() as u32).map(AgvId)
    }

    pub fn get(&self, id: AgvId) -> &Agv {
        &self.agvs[id.index()]
    }

    pub fn get_mut(&mut self, id: AgvId) -> &mut Agv {
        &mut self.agvs[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agv> {
        self.agvs.iter()
    }
}
