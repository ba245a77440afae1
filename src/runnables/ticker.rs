//! Periodic-task ticker.
//!
//! [`Ticker`] invokes a callback on a fixed interval until cancellation. In
//! spawned mode each invocation runs on its own task, tracked so that
//! in-flight invocations are drained before the ticker returns.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::RunError;
use crate::observe::Field;
use crate::runnable::Runnable;

/// Runnable that fires a callback every `interval`.
///
/// A ticker never completes on its own; it exits cleanly once the group's
/// cancellation fires.
pub struct Ticker {
    interval: Duration,
    f: Arc<dyn Fn() + Send + Sync>,
    spawned: bool,
    tracker: TaskTracker,
}

impl Ticker {
    /// Runs `f` inline on the ticker's own task every `interval`.
    ///
    /// A slow callback delays subsequent ticks.
    pub fn new(interval: Duration, f: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            f: Arc::new(f),
            spawned: false,
            tracker: TaskTracker::new(),
        }
    }

    /// Runs `f` on a freshly spawned task every `interval`.
    ///
    /// In-flight invocations are awaited on shutdown before `run` returns.
    pub fn spawned(interval: Duration, f: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            interval,
            f: Arc::new(f),
            spawned: true,
            tracker: TaskTracker::new(),
        }
    }
}

#[async_trait]
impl Runnable for Ticker {
    fn name(&self) -> &str {
        "ticker"
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::duration("interval", self.interval),
            Field::bool("spawned", self.spawned),
        ]
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), RunError> {
        // First tick fires one interval in, not immediately.
        let start = time::Instant::now() + self.interval;
        let mut ticks = time::interval_at(start, self.interval);

        loop {
            tokio::select! {
                _ = ticks.tick() => {
                    if self.spawned {
                        let f = Arc::clone(&self.f);
                        self.tracker.spawn(async move { f() });
                    } else {
                        (self.f)();
                    }
                }
                _ = ctx.cancelled() => {
                    self.tracker.close();
                    self.tracker.wait().await;
                    return Ok(());
                }
            }
        }
    }
}
