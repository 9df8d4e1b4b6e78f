//! Execution-log records.
//!
//! One record is emitted per initiated hop, never for pickups or charges.
//! Records are self-contained (ids resolved to strings at emission) so the
//! log stream can outlive the simulation state that produced it.

use std::fmt;

use agv_core::{SimTime, StationId};

/// One initiated hop, formatted as
/// `{agv_id}-{from}-{to}-{HH:MM}-{load:.1}-{payload_info}`
/// where `payload_info` is `empty` for an unladen vehicle or the
/// comma-separated ids of everything aboard.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRecord {
    pub agv:         String,
    pub from:        StationId,
    pub to:          StationId,
    pub departed_at: SimTime,
    /// Load at departure (unchanged by the hop itself).
    pub load:        f64,
    /// Ids of the payloads aboard, in attach order.
    pub payloads:    Vec<String>,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}-{:.1}-",
            self.agv, self.from, self.to, self.departed_at, self.load
        )?;
        if self.payloads.is_empty() {
            f.write_str("empty")
        } else {
            f.write_str(&self.payloads.join(","))
        }
    }
}
