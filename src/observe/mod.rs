//! Observability: typed fields, lifecycle events, and the observer sink.
//!
//! This module groups the event **data model** and the **sink** contract the
//! group reports through.
//!
//! ## Contents
//! - [`Field`], [`FieldValue`] typed key/value metadata pairs
//! - [`Event`], [`EventKind`] per-runnable phase transitions
//! - [`Observe`] the injected sink trait
//! - [`LogWriter`] built-in stdout sink (feature `logging`, default on)
//!
//! ## Quick reference
//! - **Publisher**: the [`Group`](crate::Group), once per phase transition
//!   per runnable (started-run, returned-run, started-close, returned-close
//!   or close-skipped), with an error attached on failure.
//! - **Consumer**: whatever sink was injected at group construction.

mod event;
mod field;
#[cfg(feature = "logging")]
mod log;
mod observer;

pub use event::{Event, EventKind};
pub use field::{Field, FieldValue};
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observe;

#[cfg(not(feature = "logging"))]
pub(crate) use observer::Noop;
