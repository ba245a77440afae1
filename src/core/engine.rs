//! The orchestration state machine.
//!
//! Runs every actor concurrently, detects the first completion that
//! qualifies as a shutdown trigger, broadcasts cancellation, fans out the
//! interrupt phase (concurrent or in registration order), and drains the
//! remaining executions — optionally bounded by a close timeout.
//!
//! ```text
//! Idle ──run()──► Running ──first qualifying completion──► Interrupting ──► Terminated
//!
//! Running:
//!   actor[0] ─┐
//!   actor[1] ─┼── tokio::spawn(execute(token)) ──► completion channel (cap = N)
//!   actor[N] ─┘
//!
//!   loop: recv completion
//!     ├─ sidecar && Ok ─► keep waiting (job done, not a trigger)
//!     └─ otherwise     ─► authoritative error = this result, trigger shutdown
//!   (all sidecars done with Ok ─► authoritative Ok, trigger shutdown)
//!
//! Interrupting (bounded by close_timeout when set):
//!   token.cancel()                      ── cancellation-based components exit
//!   interrupt every actor exactly once  ── concurrent, or sequential when ordered
//!   drain outstanding executions
//!   on timeout: abandon the wait; spawned tasks keep running detached, and
//!   an ordered sequence keeps invoking its remaining interrupts
//!
//! Terminated: return the authoritative error
//! ```
//!
//! ## Rules
//! - `execute` and `interrupt` are each invoked **exactly once** per actor
//! - later completions are drained, never block, never overwrite the
//!   authoritative error
//! - the timeout bounds only the engine's *wait*; there is no preemption of
//!   a component that ignores its shutdown signal (accepted leak)

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::RunError;

/// Boxed future produced by an actor's execute or interrupt closure.
pub(crate) type ActorFuture = Pin<Box<dyn Future<Output = Result<(), RunError>> + Send + 'static>>;

/// One-shot execute operation. Receives the shared cancellation token.
pub(crate) type ExecuteFn = Box<dyn FnOnce(CancellationToken) -> ActorFuture + Send + 'static>;

/// One-shot interrupt operation. Receives a token that fires when the close
/// timeout elapses.
pub(crate) type InterruptFn = Box<dyn FnOnce(CancellationToken) -> ActorFuture + Send + 'static>;

/// An execution pairing derived from one runnable. Exclusively owned by the
/// group that registered it.
pub(crate) struct Actor {
    pub(crate) execute: ExecuteFn,
    pub(crate) interrupt: InterruptFn,
    pub(crate) sidecar: bool,
}

/// Result of one actor's execute operation.
struct Completion {
    sidecar: bool,
    result: Result<(), RunError>,
}

/// Engine configuration, frozen at group construction.
pub(crate) struct Engine {
    pub(crate) close_timeout: Option<Duration>,
    pub(crate) ordered_shutdown: bool,
}

impl Engine {
    /// Runs all actors to termination and returns the authoritative error.
    pub(crate) async fn run(&self, actors: Vec<Actor>) -> Result<(), RunError> {
        if actors.is_empty() {
            return Ok(());
        }

        let count = actors.len();
        let token = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel::<Completion>(count);

        let mut interrupts: Vec<InterruptFn> = Vec::with_capacity(count);
        for actor in actors {
            interrupts.push(actor.interrupt);

            let tx = tx.clone();
            let ctx = token.clone();
            let execute = actor.execute;
            let sidecar = actor.sidecar;
            tokio::spawn(async move {
                let result = execute(ctx).await;
                // Channel is sized to the actor count, so this never blocks.
                let _ = tx.send(Completion { sidecar, result }).await;
            });
        }
        drop(tx);

        // Wait until a) a regular actor finishes, or b) a sidecar actor
        // returns an error, or c) every sidecar returns without error and no
        // regular actors remain.
        let mut authoritative: Result<(), RunError> = Ok(());
        let mut outstanding = count;
        while outstanding > 0 {
            let done = match rx.recv().await {
                Some(done) => done,
                // A sender vanishing without a completion means its execute
                // task panicked. That is not a clean shutdown.
                None => {
                    authoritative = Err(RunError::failed("runnable panicked"));
                    break;
                }
            };
            outstanding -= 1;

            if done.sidecar && done.result.is_ok() {
                continue;
            }
            authoritative = done.result;
            break;
        }

        // Signal components relying on cancellation rather than close.
        token.cancel();

        self.teardown(interrupts, rx, outstanding).await;
        authoritative
    }

    /// Interrupts every actor exactly once, then drains outstanding
    /// executions. Bounded by `close_timeout` when set; on timeout the
    /// spawned work is abandoned, not stopped.
    ///
    /// The sequence runs on its own task: a timeout abandons the *join*, so
    /// even an ordered sequence stalled on a stuck interrupt still invokes
    /// every remaining interrupt after the engine has stopped waiting.
    async fn teardown(
        &self,
        interrupts: Vec<InterruptFn>,
        mut rx: mpsc::Receiver<Completion>,
        mut outstanding: usize,
    ) {
        let close_token = CancellationToken::new();
        let ordered = self.ordered_shutdown;

        let ctx = close_token.clone();
        let wait = tokio::spawn(async move {
            if ordered {
                for interrupt in interrupts {
                    let handle = tokio::spawn(interrupt(ctx.clone()));
                    // A stuck interrupt holds the sequence only until the
                    // close timeout fires; after that, later interrupts are
                    // still invoked, just no longer awaited.
                    tokio::select! {
                        _ = handle => {}
                        _ = ctx.cancelled() => {}
                    }
                }
            } else {
                let handles: Vec<_> = interrupts
                    .into_iter()
                    .map(|interrupt| tokio::spawn(interrupt(ctx.clone())))
                    .collect();
                let all = futures::future::join_all(handles);
                tokio::select! {
                    _ = all => {}
                    _ = ctx.cancelled() => {}
                }
            }

            while outstanding > 0 {
                tokio::select! {
                    done = rx.recv() => {
                        if done.is_none() {
                            break;
                        }
                        outstanding -= 1;
                    }
                    _ = ctx.cancelled() => break,
                }
            }
        });

        match self.close_timeout {
            Some(bound) => {
                if time::timeout(bound, wait).await.is_err() {
                    // Let interrupts that honor their bounded context bail out.
                    close_token.cancel();
                }
            }
            None => {
                let _ = wait.await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn engine() -> Engine {
        Engine {
            close_timeout: None,
            ordered_shutdown: false,
        }
    }

    fn noop_interrupt() -> InterruptFn {
        Box::new(|_ctx| Box::pin(async { Ok(()) }))
    }

    #[tokio::test]
    async fn zero_actors_returns_immediately() {
        let res = time::timeout(Duration::from_millis(100), engine().run(Vec::new())).await;
        assert_eq!(res.expect("timeout"), Ok(()));
    }

    #[tokio::test]
    async fn one_actor_error_is_authoritative() {
        let actors = vec![Actor {
            execute: Box::new(|_ctx| Box::pin(async { Err(RunError::failed("foobar")) })),
            interrupt: noop_interrupt(),
            sidecar: false,
        }];
        let res = time::timeout(Duration::from_millis(100), engine().run(actors)).await;
        assert_eq!(res.expect("timeout"), Err(RunError::failed("foobar")));
    }

    #[tokio::test]
    async fn first_error_interrupts_the_rest() {
        let cancel = CancellationToken::new();
        let observed = cancel.clone();
        let closed = Arc::new(AtomicUsize::new(0));
        let closed_in_interrupt = Arc::clone(&closed);

        let actors = vec![
            Actor {
                execute: Box::new(|_ctx| Box::pin(async { Err(RunError::failed("interrupt")) })),
                interrupt: noop_interrupt(),
                sidecar: false,
            },
            Actor {
                execute: Box::new(move |_ctx| {
                    Box::pin(async move {
                        observed.cancelled().await;
                        Ok(())
                    })
                }),
                interrupt: Box::new(move |_ctx| {
                    Box::pin(async move {
                        cancel.cancel();
                        closed_in_interrupt.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                }),
                sidecar: false,
            },
        ];

        let res = time::timeout(Duration::from_millis(100), engine().run(actors)).await;
        assert_eq!(res.expect("timeout"), Err(RunError::failed("interrupt")));
        // The blocked actor's interrupt completed before run returned.
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sidecar_success_does_not_trigger_shutdown() {
        let (hold_tx, hold_rx) = tokio::sync::oneshot::channel::<()>();
        let actors = vec![
            Actor {
                execute: Box::new(|_ctx| Box::pin(async { Ok(()) })),
                interrupt: noop_interrupt(),
                sidecar: true,
            },
            Actor {
                execute: Box::new(move |_ctx| {
                    Box::pin(async move {
                        let _ = hold_rx.await;
                        Err(RunError::failed("regular"))
                    })
                }),
                interrupt: noop_interrupt(),
                sidecar: false,
            },
        ];

        let eng = engine();
        let run = tokio::spawn(async move { eng.run(actors).await });

        // Give the sidecar time to finish; the group must keep running.
        time::sleep(Duration::from_millis(50)).await;
        assert!(!run.is_finished());

        let _ = hold_tx.send(());
        let res = time::timeout(Duration::from_millis(100), run).await;
        assert_eq!(
            res.expect("timeout").expect("join"),
            Err(RunError::failed("regular"))
        );
    }

    #[tokio::test]
    async fn sidecar_error_triggers_shutdown() {
        let actors = vec![
            Actor {
                execute: Box::new(|_ctx| Box::pin(async { Err(RunError::failed("sidecar")) })),
                interrupt: noop_interrupt(),
                sidecar: true,
            },
            Actor {
                execute: Box::new(|ctx| {
                    Box::pin(async move {
                        ctx.cancelled().await;
                        Ok(())
                    })
                }),
                interrupt: noop_interrupt(),
                sidecar: false,
            },
        ];
        let res = time::timeout(Duration::from_millis(100), engine().run(actors)).await;
        assert_eq!(res.expect("timeout"), Err(RunError::failed("sidecar")));
    }

    #[tokio::test]
    async fn all_sidecars_completing_cleanly_terminates_without_error() {
        let actors = vec![
            Actor {
                execute: Box::new(|_ctx| Box::pin(async { Ok(()) })),
                interrupt: noop_interrupt(),
                sidecar: true,
            },
            Actor {
                execute: Box::new(|_ctx| Box::pin(async { Ok(()) })),
                interrupt: noop_interrupt(),
                sidecar: true,
            },
        ];
        let res = time::timeout(Duration::from_millis(100), engine().run(actors)).await;
        assert_eq!(res.expect("timeout"), Ok(()));
    }

    #[tokio::test]
    async fn ordered_shutdown_interrupts_in_registration_order() {
        let log: Arc<std::sync::Mutex<Vec<&'static str>>> =
            Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut actors = Vec::new();
        // The first interrupt is the slowest; under concurrent shutdown the
        // later ones would finish first.
        for (name, delay_ms) in [("x", 30u64), ("y", 10), ("z", 0)] {
            let log = Arc::clone(&log);
            actors.push(Actor {
                execute: Box::new(|ctx| {
                    Box::pin(async move {
                        ctx.cancelled().await;
                        Ok(())
                    })
                }),
                interrupt: Box::new(move |_ctx| {
                    Box::pin(async move {
                        time::sleep(Duration::from_millis(delay_ms)).await;
                        log.lock().unwrap().push(name);
                        Ok(())
                    })
                }),
                sidecar: true,
            });
        }
        actors.push(Actor {
            execute: Box::new(|_ctx| Box::pin(async { Ok(()) })),
            interrupt: noop_interrupt(),
            sidecar: false,
        });

        let eng = Engine {
            close_timeout: None,
            ordered_shutdown: true,
        };
        let res = time::timeout(Duration::from_secs(1), eng.run(actors)).await;
        assert_eq!(res.expect("timeout"), Ok(()));
        assert_eq!(*log.lock().unwrap(), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn close_timeout_bounds_the_wait_not_the_interrupt() {
        let actors = vec![
            Actor {
                execute: Box::new(|_ctx| Box::pin(async { Ok(()) })),
                interrupt: noop_interrupt(),
                sidecar: false,
            },
            Actor {
                execute: Box::new(|ctx| {
                    Box::pin(async move {
                        ctx.cancelled().await;
                        Ok(())
                    })
                }),
                // Never finishes; the engine must abandon the wait.
                interrupt: Box::new(|_ctx| Box::pin(std::future::pending::<Result<(), RunError>>())),
                sidecar: false,
            },
        ];

        let eng = Engine {
            close_timeout: Some(Duration::from_millis(50)),
            ordered_shutdown: false,
        };
        let started = time::Instant::now();
        let res = time::timeout(Duration::from_secs(1), eng.run(actors)).await;
        assert_eq!(res.expect("timeout"), Ok(()));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn ordered_timeout_still_interrupts_later_actors() {
        let closes = Arc::new(AtomicUsize::new(0));

        let mut actors = vec![Actor {
            execute: Box::new(|_ctx| Box::pin(async { Ok(()) })),
            // Ignores its context entirely and stalls the ordered sequence.
            interrupt: Box::new(|_ctx| Box::pin(std::future::pending::<Result<(), RunError>>())),
            sidecar: false,
        }];
        for _ in 0..2 {
            let closes = Arc::clone(&closes);
            actors.push(Actor {
                execute: Box::new(|ctx| {
                    Box::pin(async move {
                        ctx.cancelled().await;
                        Ok(())
                    })
                }),
                interrupt: Box::new(move |_ctx| {
                    Box::pin(async move {
                        closes.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                }),
                sidecar: false,
            });
        }

        let eng = Engine {
            close_timeout: Some(Duration::from_millis(50)),
            ordered_shutdown: true,
        };
        let res = time::timeout(Duration::from_secs(1), eng.run(actors)).await;
        assert_eq!(res.expect("timeout"), Ok(()));

        // The sequence moved past the stuck interrupt once the bound elapsed.
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(closes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn panicked_execute_is_not_a_clean_shutdown() {
        let actors = vec![Actor {
            execute: Box::new(|_ctx| Box::pin(async { panic!("boom") })),
            interrupt: noop_interrupt(),
            sidecar: false,
        }];
        let res = time::timeout(Duration::from_millis(100), engine().run(actors)).await;
        assert_eq!(
            res.expect("timeout"),
            Err(RunError::failed("runnable panicked"))
        );
    }

    #[tokio::test]
    async fn execute_and_interrupt_run_exactly_once_per_actor() {
        let executes = Arc::new(AtomicUsize::new(0));
        let interrupts = Arc::new(AtomicUsize::new(0));

        let mut actors = Vec::new();
        for i in 0..3 {
            let executes = Arc::clone(&executes);
            let interrupts = Arc::clone(&interrupts);
            actors.push(Actor {
                execute: Box::new(move |ctx| {
                    Box::pin(async move {
                        executes.fetch_add(1, Ordering::SeqCst);
                        if i == 0 {
                            return Err(RunError::failed("trigger"));
                        }
                        ctx.cancelled().await;
                        Ok(())
                    })
                }),
                interrupt: Box::new(move |_ctx| {
                    Box::pin(async move {
                        interrupts.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    })
                }),
                sidecar: false,
            });
        }

        let res = time::timeout(Duration::from_millis(200), engine().run(actors)).await;
        assert_eq!(res.expect("timeout"), Err(RunError::failed("trigger")));
        assert_eq!(executes.load(Ordering::SeqCst), 3);
        assert_eq!(interrupts.load(Ordering::SeqCst), 3);
    }
}
