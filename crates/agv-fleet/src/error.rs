//! Fleet and input-loading error types.

use thiserror::Error;

use agv_core::{PayloadId, SimTime};

/// State-machine violations.  The scheduler's preconditions make these
/// unreachable in a correct run; they exist so a policy defect is contained
/// instead of corrupting vehicle state.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("vehicle {agv} is not idle")]
    NotIdle { agv: String },

    #[error("vehicle {agv} is not moving")]
    NotMoving { agv: String },

    #[error("vehicle {agv} is not charging")]
    NotCharging { agv: String },

    #[error("vehicle {agv} is busy until {busy_until}")]
    StillBusy { agv: String, busy_until: SimTime },

    #[error("vehicle {agv} battery is empty")]
    BatteryEmpty { agv: String },

    #[error("vehicle {agv} battery is already full")]
    BatteryFull { agv: String },

    #[error("payload {payload} ({weight}) would overload vehicle {agv} carrying {load}")]
    CapacityOverflow {
        agv:     String,
        payload: PayloadId,
        load:    f64,
        weight:  f64,
    },

    #[error("vehicle {agv} does not hold payload {payload}")]
    NotHeld { agv: String, payload: PayloadId },
}

/// Input-file rejections.  All are fatal before scheduling begins.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed payload file: {0}")]
    Parse(String),

    #[error("duplicate payload id {0:?}")]
    DuplicateId(String),

    #[error("payload {payload:?} references unknown station {station}")]
    UnknownStation { payload: String, station: u32 },

    #[error("payload {payload:?} weight {weight} outside (0, {max}]")]
    WeightOutOfRange { payload: String, weight: f64, max: f64 },

    #[error("payload {payload:?} priority {code} outside 1..=3")]
    BadPriority { payload: String, code: u8 },

    #[error("payload {payload:?} has equal source and destination {station}")]
    SameSourceDestination { payload: String, station: u32 },

    #[error("payload {payload:?} dispatch time {value:?} is not H:MM")]
    BadTime { payload: String, value: String },
}
