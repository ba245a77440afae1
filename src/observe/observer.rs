//! The observer contract.
//!
//! An [`Observe`] implementation is injected into a [`Group`](crate::Group)
//! at construction and receives every lifecycle [`Event`]. Observation is not
//! part of orchestration correctness: the group behaves identically with a
//! no-op sink.

use super::event::Event;

/// Sink for lifecycle events.
///
/// `on_event` is called inline from the orchestration path and must be cheap
/// and non-blocking. Hand off to a channel or spawn if the handling is slow.
///
/// # Example
/// ```
/// use runvisor::{Event, Observe};
///
/// struct Counter(std::sync::atomic::AtomicU64);
///
/// impl Observe for Counter {
///     fn on_event(&self, _ev: &Event) {
///         self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///     }
/// }
/// ```
pub trait Observe: Send + Sync + 'static {
    /// Handles one lifecycle event.
    fn on_event(&self, ev: &Event);
}

/// Discards every event. Used as the default sink when the `logging` feature
/// is disabled.
#[cfg(not(feature = "logging"))]
#[derive(Debug, Default)]
pub struct Noop;

#[cfg(not(feature = "logging"))]
impl Observe for Noop {
    fn on_event(&self, _ev: &Event) {}
}
