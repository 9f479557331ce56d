//! Round history telemetry
//!
//! One record per terminal event, append-only, never mutated after emission.
//! Appends must not fail the tick: sinks log and drop on write errors.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sim::RoundOutcome;

/// A single round's outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Host clock timestamp (ms) of the terminal event
    pub timestamp_ms: f64,
    /// Target letter of the round
    pub target: char,
    /// How the round ended
    pub outcome: RoundOutcome,
    /// Session score after the event
    pub score: i64,
    /// Extra context, e.g. which distractor was caught
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Append-only round log. Read-back exposes only a count for display.
pub trait RoundLog {
    fn append(&mut self, record: RoundRecord);
    fn count(&self) -> usize;
}

/// In-memory log for tests and headless sessions
#[derive(Debug, Default)]
pub struct MemoryRoundLog {
    pub records: Vec<RoundRecord>,
}

impl MemoryRoundLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoundLog for MemoryRoundLog {
    fn append(&mut self, record: RoundRecord) {
        self.records.push(record);
    }

    fn count(&self) -> usize {
        self.records.len()
    }
}

/// JSON-lines file log; write failures drop the record and keep playing
pub struct JsonlRoundLog {
    path: PathBuf,
    written: usize,
}

impl JsonlRoundLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: 0,
        }
    }

    fn try_append(&self, record: &RoundRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl RoundLog for JsonlRoundLog {
    fn append(&mut self, record: RoundRecord) {
        match self.try_append(&record) {
            Ok(()) => self.written += 1,
            Err(err) => {
                log::warn!("round record dropped ({}): {err}", self.path.display());
            }
        }
    }

    fn count(&self) -> usize {
        self.written
    }
}
