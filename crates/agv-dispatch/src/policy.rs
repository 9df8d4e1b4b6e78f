//! The `DispatchPolicy` trait and the shipped priority-ladder policy.

use std::collections::BTreeMap;

use tracing::debug;

use agv_core::params::{
    CRITICAL_BATTERY, FULL_BATTERY, LOW_BATTERY_THRESHOLD, MAX_CAPACITY, MIN_BATTERY_FOR_PICKUP,
};
use agv_core::{AgvId, PayloadId, StationId};
use agv_fleet::Agv;

use crate::{DispatchAction, DispatchContext, HopPurpose};

// ── DispatchPolicy ────────────────────────────────────────────────────────────

/// Pluggable per-vehicle action selection.
///
/// The simulation loop calls [`decide`][Self::decide] once per idle vehicle
/// per tick, in fleet order, and applies the action itself.  Implementations
/// must be pure functions of the context — no interior mutation — so runs
/// replay identically.
pub trait DispatchPolicy: Send + Sync {
    /// Choose what `agv` (guaranteed idle) should do at `ctx.now`.
    fn decide(&self, agv: AgvId, ctx: &DispatchContext<'_>) -> DispatchAction;
}

// ── PriorityLadder ────────────────────────────────────────────────────────────

/// The reference policy: a fixed ladder of rules, first applicable wins.
///
/// 1. **Critical charge dash** — battery below the critical level: one hop
///    toward the charger, even laden.
/// 2. **Begin charge** — parked at the charger with less than a full battery.
/// 3. **Deliver** — anything aboard: one hop toward the nearest held
///    destination (ties to the smaller station id).
/// 4. **Preventive charge** — empty and battery below the comfort level:
///    one hop toward the charger.
/// 5. **Pickup** — battery permitting, the candidate-set selection below.
///
/// A rule whose route query comes back unreachable yields nothing and the
/// ladder falls through to the next rule; an exhausted vehicle away from
/// the charger holds position permanently.
pub struct PriorityLadder;

impl DispatchPolicy for PriorityLadder {
    fn decide(&self, agv: AgvId, ctx: &DispatchContext<'_>) -> DispatchAction {
        let vehicle = ctx.fleet.get(agv);

        if vehicle.battery() <= 0.0 && vehicle.station() != ctx.params.charging_station {
            return DispatchAction::Hold; // stranded until the end of the run
        }

        critical_charge_dash(vehicle, ctx)
            .or_else(|| begin_charge(vehicle, ctx))
            .or_else(|| deliver_held(vehicle, ctx))
            .or_else(|| preventive_charge(vehicle, ctx))
            .or_else(|| pick_up(vehicle, ctx))
            .unwrap_or(DispatchAction::Hold)
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

fn critical_charge_dash(vehicle: &Agv, ctx: &DispatchContext<'_>) -> Option<DispatchAction> {
    if vehicle.battery() >= CRITICAL_BATTERY || vehicle.station() == ctx.params.charging_station {
        return None;
    }
    hop_toward(vehicle, ctx, ctx.params.charging_station, HopPurpose::CriticalCharge)
}

fn begin_charge(vehicle: &Agv, ctx: &DispatchContext<'_>) -> Option<DispatchAction> {
    let at_charger = vehicle.station() == ctx.params.charging_station;
    (at_charger && vehicle.battery() < FULL_BATTERY).then_some(DispatchAction::StartCharge)
}

fn deliver_held(vehicle: &Agv, ctx: &DispatchContext<'_>) -> Option<DispatchAction> {
    if vehicle.held().is_empty() {
        return None;
    }

    let paths = ctx.network.paths_from(vehicle.station());

    // Nearest held destination; ties go to the smaller station id.
    let target = vehicle
        .held()
        .iter()
        .map(|c| ctx.payloads.get(c.payload).destination())
        .filter(|&dest| paths.distance_to(dest).is_finite())
        .min_by(|&a, &b| {
            paths
                .distance_to(a)
                .total_cmp(&paths.distance_to(b))
                .then(a.cmp(&b))
        });

    let Some(target) = target else {
        debug!(agv = vehicle.id(), "no held destination reachable");
        return None;
    };

    if target == vehicle.station() {
        // Arrival handling will detach; nothing to initiate.
        return Some(DispatchAction::Hold);
    }

    let to = paths.next_hop_to(target)?;
    Some(DispatchAction::Hop { to, purpose: HopPurpose::Deliver })
}

fn preventive_charge(vehicle: &Agv, ctx: &DispatchContext<'_>) -> Option<DispatchAction> {
    if !vehicle.held().is_empty()
        || vehicle.battery() >= LOW_BATTERY_THRESHOLD
        || vehicle.station() == ctx.params.charging_station
    {
        return None;
    }
    hop_toward(vehicle, ctx, ctx.params.charging_station, HopPurpose::PreventiveCharge)
}

/// Rule 5: choose a pickup station and its payload candidate set.
///
/// Dispatched, unheld payloads that individually fit the remaining capacity
/// are grouped by source station.  Each group is scanned in registry
/// (priority-first) order, greedily admitting payloads that keep the running
/// load within capacity.  Groups are then scored by
/// `(best priority, distance, station id)` and the winner either yields an
/// in-place pickup or one hop toward the source.
fn pick_up(vehicle: &Agv, ctx: &DispatchContext<'_>) -> Option<DispatchAction> {
    if vehicle.battery() < MIN_BATTERY_FOR_PICKUP {
        return None;
    }

    let load = vehicle.load();
    let headroom = MAX_CAPACITY - load;

    // Group by source, preserving registry order within each group.
    let mut by_source: BTreeMap<StationId, Vec<PayloadId>> = BTreeMap::new();
    for id in ctx.payloads.available_at(ctx.now) {
        let payload = ctx.payloads.get(id);
        if payload.weight() <= headroom {
            by_source.entry(payload.source()).or_default().push(id);
        }
    }

    let paths = ctx.network.paths_from(vehicle.station());

    let mut best: Option<(u8, f64, StationId, Vec<PayloadId>)> = None;
    for (source, group) in by_source {
        let distance = paths.distance_to(source);
        if !distance.is_finite() {
            debug!(agv = vehicle.id(), source = %source, "pickup station unreachable");
            continue;
        }

        let mut admitted = Vec::new();
        let mut running = load;
        for &id in &group {
            let weight = ctx.payloads.get(id).weight();
            if running + weight <= MAX_CAPACITY {
                admitted.push(id);
                running += weight;
            }
        }
        debug_assert!(!admitted.is_empty(), "pre-filtered group admits at least one payload");

        let priority = ctx.payloads.get(admitted[0]).priority().code();
        let better = match &best {
            None => true,
            Some((bp, bd, bs, _)) => {
                (priority, distance, source.0) < (*bp, *bd, bs.0)
            }
        };
        if better {
            best = Some((priority, distance, source, admitted));
        }
    }

    let (_, _, source, payloads) = best?;

    if source == vehicle.station() {
        return Some(DispatchAction::PickUp { payloads });
    }
    let to = paths.next_hop_to(source)?;
    Some(DispatchAction::Hop { to, purpose: HopPurpose::Pickup })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One hop along the shortest path toward `target`, or `None` when no route
/// exists (the caller's rule then falls through).
fn hop_toward(
    vehicle: &Agv,
    ctx: &DispatchContext<'_>,
    target: StationId,
    purpose: HopPurpose,
) -> Option<DispatchAction> {
    let to = ctx.network.paths_from(vehicle.station()).next_hop_to(target)?;
    Some(DispatchAction::Hop { to, purpose })
}
