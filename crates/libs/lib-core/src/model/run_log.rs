//! # Run Log
//!
//! Ordered, timestamped record of every step of one swap run. A `RunLog` is a plain
//! value owned by the run and passed `&mut` down the call chain, so concurrent runs
//! never share entries. The full sequence is handed back to the caller with every
//! outcome, including errors.

use chrono::{DateTime, Utc};
use lib_utils::time::{format_time, now_utc};
use serde::Serialize;
use std::fmt;
use tracing::info;

/// One timestamped step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", format_time(self.timestamp), self.message)
    }
}

/// Append-only log scoped to a single run.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    run_id: String,
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            entries: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Drop every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Timestamp and append a message. The entry is mirrored to `tracing`.
    pub fn append(&mut self, message: impl Into<String>) -> &LogEntry {
        let entry = LogEntry {
            timestamp: now_utc(),
            message: message.into(),
        };
        info!(run_id = %self.run_id, "{}", entry.message);

        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Copy of the sequence in append order. Does not clear it.
    pub fn drain(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries rendered as `[timestamp] message` lines.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_keep_call_order() {
        let mut log = RunLog::new("run-1");
        log.reset();
        for i in 0..5 {
            log.append(format!("step {i}"));
        }

        let entries = log.drain();
        assert_eq!(entries.len(), 5);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.message, format!("step {i}"));
        }
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_drain_after_reset_is_empty() {
        let mut log = RunLog::new("run-2");
        log.append("left over");
        log.reset();
        assert!(log.drain().is_empty());
    }

    #[test]
    fn test_drain_is_not_destructive() {
        let mut log = RunLog::new("run-3");
        log.append("a");
        log.append("b");

        assert_eq!(log.drain(), log.drain());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_lines_format() {
        let mut log = RunLog::new("run-4");
        log.append("Route received");
        let line = &log.lines()[0];
        assert!(line.starts_with('['));
        assert!(line.ends_with("] Route received"));
    }
}
