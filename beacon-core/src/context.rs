//! The per-event execution record.
//!
//! A [`Context`] wraps exactly one [`Event`] for one trip through the
//! pipeline. The event is read-only; the only thing that grows is the
//! append-only execution log, one entry per extension whose hook was
//! attempted. The log is the authoritative record of partial failures: a
//! `track` call resolves successfully even when individual extensions
//! failed, and callers inspect the log to find out what happened.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::event::Event;

/// What happened when an extension's hook was attempted on a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The hook completed and delivery continued.
    Success,
    /// The extension deliberately halted delivery to later extensions.
    Halted,
    /// The hook returned an error. Later extensions still ran.
    Failure(String),
}

/// One entry in a context's execution log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Name of the extension the entry belongs to.
    pub extension: String,
    /// Outcome of the hook invocation.
    pub outcome: Outcome,
    /// When the outcome was recorded.
    pub timestamp: DateTime<Utc>,
}

/// The mutable execution record for one event's trip through the pipeline.
///
/// Created fresh at the start of every dispatch, owned by that dispatch
/// until it is handed back to the caller, and never reused.
#[derive(Debug)]
pub struct Context {
    id: Uuid,
    event: Event,
    log: Vec<LogEntry>,
}

impl Context {
    /// Wrap an event for dispatch.
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            log: Vec::new(),
        }
    }

    /// Identity of this pipeline run (distinct from the event's id).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The wrapped event.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// The execution log, in the order outcomes were recorded.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Append an outcome for the named extension.
    pub fn record(&mut self, extension: &str, outcome: Outcome) {
        self.log.push(LogEntry {
            extension: extension.to_string(),
            outcome,
            timestamp: Utc::now(),
        });
    }

    /// Whether every attempted hook succeeded.
    pub fn succeeded(&self) -> bool {
        self.log
            .iter()
            .all(|entry| !matches!(entry.outcome, Outcome::Failure(_)))
    }

    /// The failure entries, in log order.
    pub fn failures(&self) -> impl Iterator<Item = &LogEntry> {
        self.log
            .iter()
            .filter(|entry| matches!(entry.outcome, Outcome::Failure(_)))
    }
}
