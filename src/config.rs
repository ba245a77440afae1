//! Group configuration.
//!
//! Provides [`GroupConfig`], the immutable-after-construction settings of a
//! [`Group`](crate::Group).
//!
//! ## Sentinel values
//! - `close_timeout = 0s` → unbounded (the group waits for every close and
//!   every run to return, however long that takes)

use std::time::Duration;

/// Configuration for a [`Group`](crate::Group).
///
/// Defines:
/// - **Close timeout**: how long the group waits on the interrupt phase
/// - **Shutdown ordering**: concurrent close fan-out vs strict registration order
///
/// ## Field semantics
/// - `close_timeout`: bound on the *wait* once shutdown triggers (`0s` = unbounded).
///   The bound covers the close invocations and the drain of still-running
///   components. It never stops the components themselves; stragglers keep
///   running detached after the group returns.
/// - `ordered_shutdown`: when `true`, close calls are issued strictly
///   sequentially in registration order, each awaited before the next starts.
///   Required for components with teardown dependencies. A close that stalls
///   holds the sequence only until the close timeout elapses; the remaining
///   closes are still invoked, just no longer awaited. When `false`
///   (default), all close calls run concurrently so one slow close cannot
///   stall the others.
#[derive(Clone, Debug)]
pub struct GroupConfig {
    /// Maximum time to wait for the interrupt phase before returning anyway.
    ///
    /// `Duration::ZERO` means no bound.
    pub close_timeout: Duration,

    /// Issue close calls sequentially in registration order instead of
    /// concurrently.
    pub ordered_shutdown: bool,
}

impl GroupConfig {
    /// Returns the close timeout as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(d)` → the interrupt phase is abandoned after `d`
    #[inline]
    pub fn close_bound(&self) -> Option<Duration> {
        if self.close_timeout == Duration::ZERO {
            None
        } else {
            Some(self.close_timeout)
        }
    }
}

impl Default for GroupConfig {
    /// Default configuration:
    ///
    /// - `close_timeout = 0s` (wait indefinitely)
    /// - `ordered_shutdown = false` (concurrent close fan-out)
    fn default() -> Self {
        Self {
            close_timeout: Duration::ZERO,
            ordered_shutdown: false,
        }
    }
}
