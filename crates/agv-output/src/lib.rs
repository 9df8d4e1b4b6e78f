//! `agv-output` — file-facing collaborators around the simulation core.
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`observer`] | `MoveLogObserver<W>` — streams execution-log lines      |
//! | [`report`]   | `detail_report` / `summary_report` renderers            |
//! | [`error`]    | `OutputError`, `OutputResult<T>`                        |
//!
//! The simulation core never touches the filesystem; everything here
//! consumes its structured outputs (`MoveRecord`, `SimMetrics`, terminal
//! fleet/registry state) and turns them into text.

pub mod error;
pub mod observer;
pub mod report;


pub use error::{OutputError, OutputResult};
pub use observer::MoveLogObserver;
pub use report::{detail_report, summary_report};
