//! CSV payload loader.
//!
//! # CSV format
//!
//! One row per payload, with a header:
//!
//! ```csv
//! id,source,destination,weight,priority,dispatch_time
//! payload_1,1,5,3.0,1,08:01
//! payload_2,2,8,6.5,3,8:30
//! ```
//!
//! `dispatch_time` is wall-clock `H:MM` or `HH:MM`; values before the 08:00
//! shift start clamp to it (the payload is available immediately).
//!
//! All input rejections happen here, before any scheduling: unknown
//! stations, weights outside `(0, MAX_CAPACITY]`, priorities outside
//! 1..=3, duplicate ids, and source = destination.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use agv_core::params::MAX_CAPACITY;
use agv_core::{SimTime, StationId};

use crate::payload::{Payload, Priority};
use crate::LoadError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PayloadRecord {
    id:            String,
    source:        u32,
    destination:   u32,
    weight:        f64,
    priority:      u8,
    dispatch_time: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load and validate payloads from a CSV file.
///
/// `station_count` bounds the valid station ids (stations are `1..=count`).
pub fn load_payloads_csv(path: &Path, station_count: u32) -> Result<Vec<Payload>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_payloads_reader(file, station_count)
}

/// Like [`load_payloads_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded fixtures.
pub fn load_payloads_reader<R: Read>(
    reader: R,
    station_count: u32,
) -> Result<Vec<Payload>, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut payloads = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for result in csv_reader.deserialize::<PayloadRecord>() {
        let row = result.map_err(|e| LoadError::Parse(e.to_string()))?;
        payloads.push(validate(row, station_count, &mut seen_ids)?);
    }

    Ok(payloads)
}

// ── Validation ────────────────────────────────────────────────────────────────

fn validate(
    row: PayloadRecord,
    station_count: u32,
    seen_ids: &mut HashSet<String>,
) -> Result<Payload, LoadError> {
    if !seen_ids.insert(row.id.clone()) {
        return Err(LoadError::DuplicateId(row.id));
    }

    for station in [row.source, row.destination] {
        if station < 1 || station > station_count {
            return Err(LoadError::UnknownStation { payload: row.id, station });
        }
    }
    if row.source == row.destination {
        return Err(LoadError::SameSourceDestination {
            payload: row.id,
            station: row.source,
        });
    }

    if !(row.weight > 0.0 && row.weight <= MAX_CAPACITY) {
        return Err(LoadError::WeightOutOfRange {
            payload: row.id,
            weight:  row.weight,
            max:     MAX_CAPACITY,
        });
    }

    let Some(priority) = Priority::from_code(row.priority) else {
        return Err(LoadError::BadPriority { payload: row.id, code: row.priority });
    };

    let dispatch_time = parse_wall_clock(&row.dispatch_time).ok_or_else(|| LoadError::BadTime {
        payload: row.id.clone(),
        value:   row.dispatch_time.clone(),
    })?;

    Ok(Payload::new(
        row.id,
        StationId(row.source),
        StationId(row.destination),
        row.weight,
        priority,
        dispatch_time,
    ))
}

/// Parse `H:MM` / `HH:MM` into a sim timestamp.
fn parse_wall_clock(s: &str) -> Option<SimTime> {
    let (h, m) = s.trim().split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour >= 24 || minute >= 60 || m.len() != 2 {
        return None;
    }
    Some(SimTime::from_wall_clock(hour, minute))
}
