//! Task-tracker reaper.
//!
//! [`Reaper`] holds a group open until a shared [`TaskTracker`] drains.
//! Useful when dynamically spawned work (async API executions, background
//! jobs) must complete before the process exits.
//!
//! Unlike cancellation-based runnables, the reaper demonstrates a
//! close-driven component: its `run` ignores the token and blocks until
//! `close` is invoked, then waits for every tracked task.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::RunError;
use crate::runnable::Runnable;

/// Runnable that waits for a shared task tracker to drain on shutdown.
pub struct Reaper {
    tracker: TaskTracker,
    done: CancellationToken,
}

impl Reaper {
    /// Reaps the given tracker. Spawn dynamic work through
    /// [`Reaper::tracker`] (or a clone of the tracker).
    pub fn new(tracker: TaskTracker) -> Self {
        Self {
            tracker,
            done: CancellationToken::new(),
        }
    }

    /// The tracked set of dynamic tasks.
    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }
}

#[async_trait]
impl Runnable for Reaper {
    fn name(&self) -> &str {
        "task reaper"
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<(), RunError> {
        self.done.cancelled().await;
        self.tracker.close();
        self.tracker.wait().await;
        Ok(())
    }

    async fn close(&self, _ctx: CancellationToken) -> Result<(), RunError> {
        self.done.cancel();
        Ok(())
    }
}
