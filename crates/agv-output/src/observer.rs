//! `MoveLogObserver<W>` — bridges `SimObserver` to a line writer.

use std::io::Write;

use agv_core::SimTime;
use agv_sim::{MoveRecord, RunOutcome, SimObserver};

use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes one execution-log line per initiated hop.
///
/// Observer hooks have no return value, so write errors are stored
/// internally; after `sim.run()` returns, check with
/// [`take_error`][Self::take_error].  The writer is flushed when the
/// simulation ends.
pub struct MoveLogObserver<W: Write> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: Write> MoveLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect an in-memory buffer).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: Write> SimObserver for MoveLogObserver<W> {
    fn on_move(&mut self, record: &MoveRecord) {
        let result = writeln!(self.writer, "{record}").map_err(OutputError::from);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _outcome: RunOutcome, _now: SimTime) {
        let result = self.writer.flush().map_err(OutputError::from);
        self.store_err(result);
    }
}
