//! Plain-text report rendering.
//!
//! Two formats: the detail report walks everything (per-vehicle status,
//! undelivered payloads, the full execution log), the summary sticks to
//! the headline metrics.  Both are pure string builders over the core's
//! structured outputs.

use std::fmt::Write;

use agv_fleet::{Fleet, PayloadRegistry, Priority};
use agv_sim::{MoveRecord, SimMetrics};

/// Render the full simulation report.
pub fn detail_report(
    metrics: &SimMetrics,
    fleet: &Fleet,
    payloads: &PayloadRegistry,
    log: &[MoveRecord],
) -> String {
    let mut out = String::new();

    // Infallible: `write!` into a String cannot fail.
    let _ = writeln!(out, "AGV Fleet Scheduling Simulation Report");
    let _ = writeln!(out, "=====================================");
    let _ = writeln!(out);

    let _ = writeln!(out, "1. Summary Statistics");
    let _ = writeln!(out, "---------------------");
    let _ = writeln!(out, "Total execution time: {} minutes", metrics.makespan_minutes);
    let _ = writeln!(out, "Total payloads: {}", metrics.total_payloads);
    let _ = writeln!(out, "Delivered payloads: {}", metrics.delivered_count);
    let undelivered = metrics.total_payloads - metrics.delivered_count;
    if undelivered > 0 {
        let _ = writeln!(out, "Undelivered payloads: {undelivered}");
    }
    let _ = writeln!(out, "Delivery rate: {:.1}%", metrics.delivery_rate());
    let _ = writeln!(out);

    let _ = writeln!(out, "2. Average Delivery Time by Priority");
    let _ = writeln!(out, "----------------------------------");
    for priority in Priority::ALL {
        let _ = writeln!(
            out,
            "Priority {priority}: {:.2} minutes",
            metrics.avg_for(priority)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "3. AGV Status");
    let _ = writeln!(out, "------------");
    for agv in fleet.iter() {
        let _ = writeln!(out, "- {}:", agv.id());
        let _ = writeln!(out, "  - Final location: Station {}", agv.station());
        let _ = writeln!(out, "  - Final battery level: {:.1}%", agv.battery());
        let _ = writeln!(out, "  - Charge count: {}", agv.charge_count());
        if !agv.held().is_empty() {
            let carried: Vec<&str> = agv
                .held()
                .iter()
                .map(|c| payloads.get(c.payload).id())
                .collect();
            let _ = writeln!(out, "  - Carrying payloads: {}", carried.join(", "));
        }
    }
    let _ = writeln!(out);

    let undelivered: Vec<_> = payloads.undelivered().collect();
    if !undelivered.is_empty() {
        let _ = writeln!(out, "4. Undelivered Payloads");
        let _ = writeln!(out, "----------------------");
        for id in undelivered {
            let p = payloads.get(id);
            let _ = writeln!(
                out,
                "- {} (Priority: {}, Source: Station {}, Destination: Station {}, Weight: {})",
                p.id(),
                p.priority(),
                p.source(),
                p.destination(),
                p.weight()
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "5. Execution Logs Summary");
    let _ = writeln!(out, "-----------------------");
    let _ = writeln!(out, "Total log entries: {}", log.len());
    let _ = writeln!(out);

    let _ = writeln!(out, "6. Full Execution Logs");
    let _ = writeln!(out, "--------------------");
    for record in log {
        let _ = writeln!(out, "- {record}");
    }

    out
}

/// Render the headline-metrics report.
pub fn summary_report(metrics: &SimMetrics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "AGV Fleet Scheduling - Summary Report");
    let _ = writeln!(out, "====================================");
    let _ = writeln!(out);

    let _ = writeln!(out, "1. Total Execution Time: {} minutes", metrics.makespan_minutes);
    let _ = writeln!(out);

    let _ = writeln!(out, "2. Average Delivery Time by Priority:");
    for priority in Priority::ALL {
        let _ = writeln!(
            out,
            "   Priority {priority}: {:.2} minutes",
            metrics.avg_for(priority)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "3. AGV Charge Count:");
    for (agv, count) in &metrics.charge_counts {
        let _ = writeln!(out, "   {agv}: {count} charges");
    }
    let _ = writeln!(out, "   Total charges: {}", metrics.total_charge_count());
    let _ = writeln!(out);

    let _ = writeln!(out, "4. Delivery Statistics:");
    let _ = writeln!(
        out,
        "   Payloads delivered: {} / {} ({:.1}%)",
        metrics.delivered_count,
        metrics.total_payloads,
        metrics.delivery_rate()
    );

    out
}
