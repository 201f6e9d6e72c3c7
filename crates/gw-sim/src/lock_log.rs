//! CSV lock transition log.
//!
//! Records every tracker lock transition the server produces as one CSV row:
//!
//! ```csv
//! tick,sensor,previous,current
//! 14,70,,900
//! 96,70,900,901
//! 210,70,901,
//! ```
//!
//! Empty `previous`/`current` cells mean "no target held".
//!
//! `LockLogger` implements [`NetObserver`] directly.  Observer callbacks have
//! no return value, so write errors are parked internally; after the run,
//! check [`take_error`][LockLogger::take_error].

use std::fs::File;
use std::path::Path;

use csv::Writer;

use gw_core::{EntityId, Tick};
use gw_tracker::LockEvent;

use crate::observer::NetObserver;
use crate::{SimError, SimResult};

/// Writes lock transitions to a single CSV file.
pub struct LockLogger {
    writer:     Writer<File>,
    finished:   bool,
    last_error: Option<SimError>,
}

impl LockLogger {
    /// Open (or create) `path` and write the header row.
    pub fn create(path: &Path) -> SimResult<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["tick", "sensor", "previous", "current"])?;
        Ok(Self {
            writer,
            finished: false,
            last_error: None,
        })
    }

    /// Take the parked write error (if any) after the run completes.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush the file.  Idempotent; called automatically from `on_sim_end`.
    pub fn finish(&mut self) -> SimResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }

    fn write_row(&mut self, tick: Tick, event: &LockEvent) -> SimResult<()> {
        self.writer.write_record(&[
            tick.0.to_string(),
            event.sensor.0.to_string(),
            cell(event.previous),
            cell(event.current),
        ])?;
        Ok(())
    }

    fn park(&mut self, result: SimResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl NetObserver for LockLogger {
    fn on_lock_event(&mut self, tick: Tick, event: &LockEvent) {
        let result = self.write_row(tick, event);
        self.park(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.finish();
        self.park(result);
    }
}

fn cell(target: Option<EntityId>) -> String {
    match target {
        Some(id) => id.0.to_string(),
        None => String::new(),
    }
}
