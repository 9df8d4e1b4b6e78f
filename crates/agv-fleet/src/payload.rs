//! Payload descriptors and the registry that tracks their lifecycle.
//!
//! Descriptors are immutable once loaded.  The registry adds the mutable
//! lifecycle: undispatched → available → held by exactly one vehicle →
//! delivered (terminal).  Registry order is (priority ascending, dispatch
//! time ascending), fixed at construction, so every scan over payloads is
//! deterministic and priority-first.

use agv_core::{AgvId, PayloadId, SimTime, StationId};

// ── Priority ──────────────────────────────────────────────────────────────────

/// Transport priority class.  Code 1 is the most urgent.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    Express  = 1,
    Standard = 2,
    Deferred = 3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Express, Priority::Standard, Priority::Deferred];

    /// Parse the numeric code used in input files.
    pub fn from_code(code: u8) -> Option<Priority> {
        match code {
            1 => Some(Priority::Express),
            2 => Some(Priority::Standard),
            3 => Some(Priority::Deferred),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Zero-based index for per-priority arrays.
    #[inline]
    pub fn bucket(self) -> usize {
        self as usize - 1
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ── Payload ───────────────────────────────────────────────────────────────────

/// An immutable transport job.
#[derive(Clone, Debug)]
pub struct Payload {
    id:            String,
    source:        StationId,
    destination:   StationId,
    weight:        f64,
    priority:      Priority,
    dispatch_time: SimTime,
}

impl Payload {
    pub fn new(
        id: impl Into<String>,
        source: StationId,
        destination: StationId,
        weight: f64,
        priority: Priority,
        dispatch_time: SimTime,
    ) -> Self {
        Self {
            id: id.into(),
            source,
            destination,
            weight,
            priority,
            dispatch_time,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> StationId {
        self.source
    }

    pub fn destination(&self) -> StationId {
        self.destination
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Earliest time the payload may be picked up.
    pub fn dispatch_time(&self) -> SimTime {
        self.dispatch_time
    }
}

// ── PayloadRegistry ───────────────────────────────────────────────────────────

struct PayloadSlot {
    payload:      Payload,
    delivered:    bool,
    holder:       Option<AgvId>,
    picked_up_at: Option<SimTime>,
}

/// All payloads of a run, in (priority, dispatch-time) order.
///
/// `PayloadId`s are positions in this order; the sort is stable, so jobs
/// that tie keep their input-file order.
pub struct PayloadRegistry {
    slots: Vec<PayloadSlot>,
}

impl PayloadRegistry {
    pub fn new(mut payloads: Vec<Payload>) -> Self {
        payloads.sort_by_key(|p| (p.priority, p.dispatch_time));
        let slots = payloads
            .into_iter()
            .map(|payload| PayloadSlot {
                payload,
                delivered:    false,
                holder:       None,
                picked_up_at: None,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterator over all ids in registry (priority-first) order.
    pub fn ids(&self) -> impl Iterator<Item = PayloadId> {
        (0..self.slots.len() as u32).map(PayloadId)
    }

    pub fn get(&self, id: PayloadId) -> &Payload {
        &self.slots[id.index()].payload
    }

    // ── Lifecycle state ───────────────────────────────────────────────────

    pub fn is_delivered(&self, id: PayloadId) -> bool {
        self.slots[id.index()].delivered
    }

    pub fn holder(&self, id: PayloadId) -> Option<AgvId> {
        self.slots[id.index()].holder
    }

    pub fn picked_up_at(&self, id: PayloadId) -> Option<SimTime> {
        self.slots[id.index()].picked_up_at
    }

    /// Record that `agv` took the payload aboard at `now`.
    pub fn mark_picked_up(&mut self, id: PayloadId, agv: AgvId, now: SimTime) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(!slot.delivered, "picking up delivered payload {id}");
        debug_assert!(slot.holder.is_none(), "payload {id} already held");
        slot.holder = Some(agv);
        slot.picked_up_at = Some(now);
    }

    /// Record delivery.  Terminal: a delivered payload never reverts and has
    /// no holder.
    pub fn mark_delivered(&mut self, id: PayloadId) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(slot.holder.is_some(), "delivering unheld payload {id}");
        slot.delivered = true;
        slot.holder = None;
    }

    // ── Scans ─────────────────────────────────────────────────────────────

    /// Ids of payloads that can be assigned at `now`: dispatched, not
    /// delivered, not aboard any vehicle.  Registry (priority-first) order.
    pub fn available_at(&self, now: SimTime) -> impl Iterator<Item = PayloadId> + '_ {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            let open = !slot.delivered
                && slot.holder.is_none()
                && slot.payload.dispatch_time <= now;
            open.then_some(PayloadId(i as u32))
        })
    }

    /// Ids of payloads not yet delivered, in registry order.
    pub fn undelivered(&self) -> impl Iterator<Item = PayloadId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| (!slot.delivered).then_some(PayloadId(i as u32)))
    }

    pub fn all_delivered(&self) -> bool {
        self.slots.iter().all(|s| s.delivered)
    }

    pub fn delivered_count(&self) -> usize {
        self.slots.iter().filter(|s| s.delivered).count()
    }

    /// The earliest dispatch time strictly after `now` among undelivered
    /// payloads — the next "payload becomes available" event.
    pub fn next_dispatch_after(&self, now: SimTime) -> Option<SimTime> {
        self.slots
            .iter()
            .filter(|s| !s.delivered && s.payload.dispatch_time > now)
            .map(|s| s.payload.dispatch_time)
            .min()
    }
}
