//! Error types used by the runvisor runtime and its runnables.
//!
//! A group run terminates with exactly one [`RunError`] (or `Ok`): the error
//! returned by the first qualifying component. Callers distinguish causes by
//! matching on the variant, never by comparing strings.
//!
//! Close failures never cross the [`Group`](crate::Group) boundary; they are
//! reported through the observer and discarded.

use std::fmt;

use thiserror::Error;

/// Errors produced by runnables and surfaced by a group run.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The component stopped because a cancellation propagated to it,
    /// either from the group's shared token or from a parent context.
    #[error("context canceled")]
    Canceled,

    /// The component observed an OS termination signal.
    ///
    /// Carries which signal fired so callers can react per-signal without
    /// string inspection.
    #[error("received signal {signal}")]
    Signal {
        /// The signal that was observed.
        signal: Signal,
    },

    /// Sentinel returned by the default [`Runnable::close`](crate::Runnable::close).
    ///
    /// Distinguishes "never implemented close, relies on cancellation" from a
    /// close that ran and succeeded. The group treats it as a benign no-op.
    #[error("close is not implemented")]
    CloseUnimplemented,

    /// Any other component failure.
    #[error("{error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },
}

impl RunError {
    /// Wraps an arbitrary failure message into [`RunError::Failed`].
    pub fn failed(error: impl fmt::Display) -> Self {
        RunError::Failed {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use runvisor::RunError;
    ///
    /// assert_eq!(RunError::Canceled.as_label(), "canceled");
    /// assert_eq!(RunError::failed("boom").as_label(), "failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunError::Canceled => "canceled",
            RunError::Signal { .. } => "signal",
            RunError::CloseUnimplemented => "close_unimplemented",
            RunError::Failed { .. } => "failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    ///
    /// Matches the `Display` rendering for every variant.
    pub fn as_message(&self) -> String {
        match self {
            RunError::Canceled => "context canceled".to_string(),
            RunError::Signal { signal } => format!("received signal {signal}"),
            RunError::CloseUnimplemented => "close is not implemented".to_string(),
            RunError::Failed { error } => error.clone(),
        }
    }

    /// True when the error represents a propagated cancellation rather than
    /// a component failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, RunError::Canceled)
    }
}

/// OS termination signals a [`Signals`](crate::runnables::Signals) runnable
/// can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGINT (Ctrl-C in a terminal).
    Interrupt,
    /// SIGTERM (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// SIGQUIT (hard stop, often paired with a core dump).
    Quit,
    /// SIGHUP (controlling terminal closed; often repurposed for reload).
    Hangup,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
            Signal::Hangup => "SIGHUP",
        };
        f.write_str(name)
    }
}
