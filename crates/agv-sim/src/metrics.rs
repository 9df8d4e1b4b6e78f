//! Delivery and charging metrics.

use agv_core::SimTime;
use agv_fleet::{Fleet, Priority};

// ── MetricsRecorder ───────────────────────────────────────────────────────────

/// Accumulates per-delivery measurements during the run.
///
/// Latency is measured from the payload's *pickup* event to its detach —
/// the deterministic choice; waiting time before pickup is visible in the
/// move log instead.
#[derive(Default)]
pub struct MetricsRecorder {
    /// Delivery latencies in minutes, bucketed by priority.
    latencies: [Vec<u32>; 3],
    makespan:  SimTime,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delivery(&mut self, priority: Priority, latency_min: u32) {
        self.latencies[priority.bucket()].push(latency_min);
    }

    /// Record the terminal simulation time.  Monotone: never moves backward.
    pub fn record_end(&mut self, now: SimTime) {
        self.makespan = self.makespan.max(now);
    }

    pub fn delivered_count(&self) -> usize {
        self.latencies.iter().map(Vec::len).sum()
    }

    /// Mean delivery latency for `priority`; 0 when nothing was delivered
    /// in that class.
    pub fn avg_latency(&self, priority: Priority) -> f64 {
        let bucket = &self.latencies[priority.bucket()];
        if bucket.is_empty() {
            return 0.0;
        }
        bucket.iter().map(|&l| l as f64).sum::<f64>() / bucket.len() as f64
    }

    /// Snapshot the run's summary numbers, pulling charge counts from the
    /// fleet's terminal state.
    pub fn summary(&self, fleet: &Fleet, total_payloads: usize) -> SimMetrics {
        SimMetrics {
            makespan_minutes: self.makespan.0,
            avg_delivery_by_priority: [
                self.avg_latency(Priority::Express),
                self.avg_latency(Priority::Standard),
                self.avg_latency(Priority::Deferred),
            ],
            charge_counts: fleet
                .iter()
                .map(|agv| (agv.id().to_string(), agv.charge_count()))
                .collect(),
            delivered_count: self.delivered_count(),
            total_payloads,
        }
    }
}

// ── SimMetrics ────────────────────────────────────────────────────────────────

/// Summary numbers for one completed run.
#[derive(Clone, Debug)]
pub struct SimMetrics {
    /// Minutes of simulated time from 08:00 to the last event.
    pub makespan_minutes: u32,

    /// Mean pickup→delivery latency per priority class (index 0 = priority 1).
    pub avg_delivery_by_priority: [f64; 3],

    /// Charge count per vehicle, in fleet order.
    pub charge_counts: Vec<(String, u32)>,

    pub delivered_count: usize,
    pub total_payloads:  usize,
}

impl SimMetrics {
    /// Mean latency for a priority class.
    pub fn avg_for(&self, priority: Priority) -> f64 {
        self.avg_delivery_by_priority[priority.bucket()]
    }

    pub fn total_charge_count(&self) -> u32 {
        self.charge_counts.iter().map(|(_, n)| n).sum()
    }

    /// Delivered payloads as a percentage of the total; 100 for an empty run.
    pub fn delivery_rate(&self) -> f64 {
        if self.total_payloads == 0 {
            return 100.0;
        }
        self.delivered_count as f64 / self.total_payloads as f64 * 100.0
    }
}
