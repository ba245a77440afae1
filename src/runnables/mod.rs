//! Ready-made runnables built on the component contract.
//!
//! None of these carry orchestration logic; each is an ordinary
//! [`Runnable`](crate::Runnable) the core consumes through the contract:
//!
//! - [`Signals`]: completes with a typed error on SIGINT/SIGTERM/SIGQUIT
//! - [`Parent`]: ties the group to an external cancellation handle
//! - [`Preempt`]: completes cleanly after a fixed duration
//! - [`Ticker`]: fires a callback on a fixed interval
//! - [`Reaper`]: holds shutdown until dynamically spawned work drains

mod parent;
mod preempt;
mod reaper;
mod signals;
mod ticker;

pub use parent::Parent;
pub use preempt::Preempt;
pub use reaper::Reaper;
pub use signals::Signals;
pub use ticker::Ticker;
