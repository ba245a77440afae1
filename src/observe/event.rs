//! Lifecycle events emitted by a running group.
//!
//! The [`EventKind`] enum classifies the per-runnable phase transitions:
//! run started/returned and close started/returned (or skipped, when the
//! runnable relies on cancellation instead of an explicit close).
//!
//! The [`Event`] struct carries the runnable's name, its metadata fields,
//! an error message on failure, and a wall-clock timestamp.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events from
//! concurrently running runnables are observed out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use super::field::Field;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The runnable's `run` is about to be invoked.
    RunStarted,

    /// The runnable's `run` returned.
    ///
    /// Sets `error` when it returned a failure; that failure is the
    /// authoritative error if this completion triggered shutdown.
    RunReturned,

    /// The runnable's `close` is about to be invoked.
    CloseStarted,

    /// The runnable's `close` returned.
    ///
    /// Sets `error` on close failure. Close failures are only ever surfaced
    /// here; they never become the group's return value.
    CloseReturned,

    /// The runnable does not implement `close` and relies on the shared
    /// cancellation token instead.
    CloseSkipped,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::RunStarted => "run_started",
            EventKind::RunReturned => "run_returned",
            EventKind::CloseStarted => "close_started",
            EventKind::CloseReturned => "close_returned",
            EventKind::CloseSkipped => "close_skipped",
        }
    }
}

/// A single lifecycle event for one runnable.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,
    /// Name of the runnable this event belongs to.
    pub runnable: Arc<str>,
    /// Metadata fields declared by the runnable.
    pub fields: Vec<Field>,
    /// Error message, present on run/close failure.
    pub error: Option<Arc<str>>,
    /// Wall-clock timestamp taken at construction.
    pub at: SystemTime,
    /// Globally monotonic sequence number.
    pub seq: u64,
}

impl Event {
    /// Creates a new event with a fresh sequence number.
    pub fn new(kind: EventKind, runnable: impl Into<Arc<str>>) -> Self {
        Self {
            kind,
            runnable: runnable.into(),
            fields: Vec::new(),
            error: None,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed) + 1,
        }
    }

    /// Attaches metadata fields.
    #[inline]
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    /// Attaches an error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }
}
