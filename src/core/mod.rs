//! Runtime core: the orchestration state machine and its public surface.
//!
//! The only public API from this module is [`Group`].
//!
//! Internal modules:
//! - [`engine`]: fan-out execution, trigger detection, interrupt phase,
//!   close-timeout handling;
//! - [`group`]: registration, instrumentation wrapping, liveness aggregate.

mod engine;
mod group;

pub use group::Group;
