//! Match log and audit counters.
//!
//! Every notable event in a match is appended to a capped in-state log. The
//! log is part of the committed snapshot, so a warning written during a
//! rejected-but-committed action survives exactly like any other mutation.
//!
//! The audit counters exist because the engine prefers liveness over
//! completeness on malformed-state paths: an effect can be dropped rather
//! than wedging the match. The counters make those drops observable instead
//! of indistinguishable from "nothing was pending".

use im::Vector;
use serde::{Deserialize, Serialize};

/// Severity of a log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One append-only log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub turn: u32,
    pub message: String,
}

/// Append-only, capped match log.
///
/// Backed by `im::Vector` so state snapshots share structure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchLog {
    entries: Vector<LogEntry>,
    cap: usize,
}

impl MatchLog {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            entries: Vector::new(),
            cap,
        }
    }

    /// Append an entry, dropping the oldest when over the cap.
    pub fn push(&mut self, level: LogLevel, turn: u32, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Info => tracing::debug!(turn, "{message}"),
            LogLevel::Warning => tracing::warn!(turn, "{message}"),
            LogLevel::Error => tracing::error!(turn, "{message}"),
        }
        self.entries.push_back(LogEntry {
            level,
            turn,
            message,
        });
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    pub fn info(&mut self, turn: u32, message: impl Into<String>) {
        self.push(LogLevel::Info, turn, message);
    }

    pub fn warning(&mut self, turn: u32, message: impl Into<String>) {
        self.push(LogLevel::Warning, turn, message);
    }

    pub fn error(&mut self, turn: u32, message: impl Into<String>) {
        self.push(LogLevel::Error, turn, message);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The most recent entries, newest last.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }
}

/// Counters distinguishing "expected empty" from "invariant violated".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditCounters {
    /// Recovery paths taken because state was malformed.
    pub invariant_violations: u32,
    /// Effects discarded by a recovery path instead of resolving.
    pub dropped_effects: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_append_order() {
        let mut log = MatchLog::new(10);
        log.info(1, "a");
        log.warning(1, "b");

        let msgs: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, vec!["a", "b"]);
        assert_eq!(log.iter().next().map(|e| e.level), Some(LogLevel::Info));
    }

    #[test]
    fn test_log_cap_drops_oldest() {
        let mut log = MatchLog::new(3);
        for i in 0..5 {
            log.info(1, format!("m{i}"));
        }

        assert_eq!(log.len(), 3);
        let msgs: Vec<_> = log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(msgs, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_tail() {
        let mut log = MatchLog::new(10);
        for i in 0..4 {
            log.info(1, format!("m{i}"));
        }

        let tail: Vec<_> = log.tail(2).map(|e| e.message.as_str()).collect();
        assert_eq!(tail, vec!["m2", "m3"]);
    }
}
