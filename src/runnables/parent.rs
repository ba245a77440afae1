//! Parent-context watcher.
//!
//! [`Parent`] ties a group's lifetime to an externally supplied cancellation
//! handle: when the parent token fires, the watcher returns
//! [`RunError::Canceled`] and triggers group-wide shutdown with that cause.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RunError;
use crate::runnable::Runnable;

/// Runnable that terminates when a parent token is cancelled.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use runvisor::{Group, GroupConfig, RunError, RunnableRef};
/// use runvisor::runnables::Parent;
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let parent = CancellationToken::new();
/// let group = Group::new(GroupConfig::default());
/// group.always([Arc::new(Parent::new(parent.clone())) as RunnableRef]);
///
/// parent.cancel();
/// assert_eq!(group.run().await, Err(RunError::Canceled));
/// # }
/// ```
pub struct Parent {
    parent: CancellationToken,
}

impl Parent {
    /// Watches the given parent token.
    pub fn new(parent: CancellationToken) -> Self {
        Self { parent }
    }
}

#[async_trait]
impl Runnable for Parent {
    fn name(&self) -> &str {
        "parent watcher"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), RunError> {
        tokio::select! {
            _ = self.parent.cancelled() => Err(RunError::Canceled),
            _ = ctx.cancelled() => Err(RunError::Canceled),
        }
    }
}
