//! Time-bounded preempter.
//!
//! [`Preempt`] completes cleanly after a fixed duration. Registered as a
//! regular member it caps how long the whole group runs; useful for smoke
//! tests and bounded batch runs.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RunError;
use crate::observe::Field;
use crate::runnable::Runnable;

/// Runnable that returns without error after `after` elapses.
pub struct Preempt {
    after: Duration,
}

impl Preempt {
    /// Preempts the group after the given duration.
    pub fn new(after: Duration) -> Self {
        Self { after }
    }
}

#[async_trait]
impl Runnable for Preempt {
    fn name(&self) -> &str {
        "preempter"
    }

    fn fields(&self) -> Vec<Field> {
        vec![Field::duration("after", self.after)]
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), RunError> {
        tokio::select! {
            _ = tokio::time::sleep(self.after) => Ok(()),
            _ = ctx.cancelled() => Err(RunError::Canceled),
        }
    }
}
