//! The public orchestrator surface.
//!
//! [`Group`] owns an ordered collection of actors derived from registered
//! [`Runnable`]s, wraps each one with lifecycle instrumentation, and drives
//! the [`Engine`] state machine when [`run`](Group::run) is invoked.
//!
//! ```text
//! caller                      Group                          Engine
//!   │ always(r) / add(when, r)  │                              │
//!   ├──────────────────────────►│ wrap run/close with events   │
//!   │ run()                     ├─────────────────────────────►│ fan out, detect
//!   │                           │                              │ trigger, interrupt,
//!   │◄── authoritative error ───┴──────────────────────────────┤ drain
//! ```

use std::sync::{Arc, Mutex, RwLock};

use tokio_util::sync::CancellationToken;

use crate::config::GroupConfig;
use crate::core::engine::{Actor, ActorFuture, Engine};
use crate::error::RunError;
use crate::observe::{Event, EventKind, Field, Observe};
use crate::runnable::RunnableRef;

/// Collects runnables and runs them concurrently with deterministic teardown.
///
/// There are two kinds of registration: regular and sidecar. When a regular
/// runnable returns, every runnable is interrupted unconditionally. When a
/// sidecar returns without error it is treated as having finished its job and
/// the rest keep running; a sidecar error interrupts everyone.
///
/// A group runs once. Registration must happen strictly before the run; the
/// actor list is drained when the run starts, and a second run finds it empty.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use runvisor::{Group, GroupConfig, RunnableRef};
/// use runvisor::runnables::Signals;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), runvisor::RunError> {
///     let group = Group::new(GroupConfig::default());
///     let signals: RunnableRef = Arc::new(Signals::terminal());
///     group.always([signals]);
///     group.run().await
/// }
/// ```
pub struct Group {
    config: GroupConfig,
    observer: Arc<dyn Observe>,
    runnables: RwLock<Vec<RunnableRef>>,
    actors: Mutex<Vec<Actor>>,
}

impl Group {
    /// Creates a group with the default observer sink.
    ///
    /// With the `logging` feature (default) that is the stdout
    /// [`LogWriter`](crate::LogWriter); without it, events are discarded.
    pub fn new(config: GroupConfig) -> Self {
        Self::with_observer(config, default_observer())
    }

    /// Creates a group reporting lifecycle events to `observer`.
    pub fn with_observer(config: GroupConfig, observer: Arc<dyn Observe>) -> Self {
        Self {
            config,
            observer,
            runnables: RwLock::new(Vec::new()),
            actors: Mutex::new(Vec::new()),
        }
    }

    /// Appends each runnable to the group if the condition is met,
    /// preserving order.
    pub fn add(&self, when: bool, runnables: impl IntoIterator<Item = RunnableRef>) {
        if !when {
            return;
        }
        for r in runnables {
            self.register(r, false);
        }
    }

    /// Appends each runnable unconditionally.
    pub fn always(&self, runnables: impl IntoIterator<Item = RunnableRef>) {
        self.add(true, runnables);
    }

    /// Appends each runnable as a sidecar if the condition is met.
    ///
    /// A sidecar that returns without error does not interrupt the group.
    pub fn add_sidecar(&self, when: bool, runnables: impl IntoIterator<Item = RunnableRef>) {
        if !when {
            return;
        }
        for r in runnables {
            self.register(r, true);
        }
    }

    /// Runs all registered runnables and manages their lifecycle:
    ///
    /// 1. Invoke `run` on each runnable concurrently.
    /// 2. Wait for the first qualifying completion.
    /// 3. Cancel the shared token.
    /// 4. Invoke `close` on each runnable exactly once (concurrently, or
    ///    sequentially in registration order when configured).
    /// 5. Wait for every close and every run to return, or abandon the wait
    ///    once the close timeout elapses.
    ///
    /// Returns the authoritative error: the one carried by the completion
    /// that triggered shutdown (`Ok` if it completed cleanly). Close failures
    /// are reported to the observer and discarded.
    pub async fn run(&self) -> Result<(), RunError> {
        let actors = std::mem::take(&mut *lock(&self.actors));
        let engine = Engine {
            close_timeout: self.config.close_bound(),
            ordered_shutdown: self.config.ordered_shutdown,
        };
        engine.run(actors).await
    }

    /// Aggregate liveness: true iff every registered runnable reports alive.
    ///
    /// Constant per-component cost; safe to call concurrently with an
    /// in-flight run.
    pub fn alive(&self) -> bool {
        read(&self.runnables).iter().all(|r| r.alive())
    }

    /// Number of registered runnables.
    pub fn len(&self) -> usize {
        read(&self.runnables).len()
    }

    /// True when no runnables are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wraps a runnable into an instrumented actor and appends it.
    fn register(&self, runnable: RunnableRef, sidecar: bool) {
        let name: Arc<str> = Arc::from(runnable.name());
        let fields = runnable.fields();

        let execute = {
            let runnable = Arc::clone(&runnable);
            let observer = Arc::clone(&self.observer);
            let name = Arc::clone(&name);
            let fields = fields.clone();
            Box::new(move |ctx: CancellationToken| -> ActorFuture {
                Box::pin(async move {
                    emit(&*observer, EventKind::RunStarted, &name, &fields, None);
                    let result = runnable.run(ctx).await;
                    emit(
                        &*observer,
                        EventKind::RunReturned,
                        &name,
                        &fields,
                        result.as_ref().err(),
                    );
                    result
                })
            })
        };

        let interrupt = {
            let runnable = Arc::clone(&runnable);
            let observer = Arc::clone(&self.observer);
            Box::new(move |ctx: CancellationToken| -> ActorFuture {
                Box::pin(async move {
                    emit(&*observer, EventKind::CloseStarted, &name, &fields, None);
                    let result = runnable.close(ctx).await;
                    match &result {
                        Ok(()) => {
                            emit(&*observer, EventKind::CloseReturned, &name, &fields, None)
                        }
                        Err(RunError::CloseUnimplemented) => {
                            emit(&*observer, EventKind::CloseSkipped, &name, &fields, None)
                        }
                        Err(err) => {
                            emit(&*observer, EventKind::CloseReturned, &name, &fields, Some(err))
                        }
                    }
                    result
                })
            })
        };

        write(&self.runnables).push(runnable);
        lock(&self.actors).push(Actor {
            execute,
            interrupt,
            sidecar,
        });
    }
}

fn emit(
    observer: &dyn Observe,
    kind: EventKind,
    name: &Arc<str>,
    fields: &[Field],
    error: Option<&RunError>,
) {
    let mut ev = Event::new(kind, Arc::clone(name)).with_fields(fields.to_vec());
    if let Some(err) = error {
        ev = ev.with_error(err.to_string());
    }
    observer.on_event(&ev);
}

#[cfg(feature = "logging")]
fn default_observer() -> Arc<dyn Observe> {
    Arc::new(crate::observe::LogWriter::new())
}

#[cfg(not(feature = "logging"))]
fn default_observer() -> Arc<dyn Observe> {
    Arc::new(crate::observe::Noop)
}

// Poison recovery: a panicked registration must not wedge liveness probes.
fn lock<'a, T>(m: &'a Mutex<T>) -> std::sync::MutexGuard<'a, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

fn read<'a, T>(l: &'a RwLock<T>) -> std::sync::RwLockReadGuard<'a, T> {
    l.read().unwrap_or_else(|e| e.into_inner())
}

fn write<'a, T>(l: &'a RwLock<T>) -> std::sync::RwLockWriteGuard<'a, T> {
    l.write().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runnable::Runnable;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::time;
    use tokio_util::sync::CancellationToken;

    struct Enriched;

    #[async_trait]
    impl Runnable for Enriched {
        fn name(&self) -> &str {
            "runnable"
        }

        fn fields(&self) -> Vec<Field> {
            vec![Field::str("foo", "bar")]
        }

        async fn run(&self, _ctx: CancellationToken) -> Result<(), RunError> {
            Ok(())
        }

        async fn close(&self, _ctx: CancellationToken) -> Result<(), RunError> {
            Ok(())
        }
    }

    struct Basic;

    #[async_trait]
    impl Runnable for Basic {
        fn alive(&self) -> bool {
            false
        }

        async fn run(&self, _ctx: CancellationToken) -> Result<(), RunError> {
            Ok(())
        }
    }

    struct Recorder(StdMutex<Vec<(EventKind, Option<String>)>>);

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self(StdMutex::new(Vec::new())))
        }

        fn kinds(&self) -> Vec<EventKind> {
            self.0.lock().unwrap().iter().map(|(k, _)| *k).collect()
        }
    }

    impl Observe for Recorder {
        fn on_event(&self, ev: &Event) {
            self.0
                .lock()
                .unwrap()
                .push((ev.kind, ev.error.as_ref().map(|e| e.to_string())));
        }
    }

    #[test]
    fn add_is_conditional_and_preserves_order() {
        let g = Group::new(GroupConfig::default());
        g.add(true, [Arc::new(Enriched) as RunnableRef]);
        g.add(false, [Arc::new(Basic) as RunnableRef]);
        assert_eq!(g.len(), 1);
        assert!(!g.is_empty());
    }

    #[test]
    fn alive_aggregates_all_runnables() {
        let g = Group::new(GroupConfig::default());
        assert!(g.alive());

        g.always([Arc::new(Enriched) as RunnableRef]);
        assert!(g.alive());

        g.add(false, [Arc::new(Basic) as RunnableRef]);
        assert!(g.alive());

        g.add(true, [Arc::new(Basic) as RunnableRef]);
        assert!(!g.alive());
    }

    #[tokio::test]
    async fn instrumentation_covers_both_phases() {
        let rec = Recorder::new();
        let g = Group::with_observer(GroupConfig::default(), rec.clone());
        g.always([Arc::new(Enriched) as RunnableRef]);

        let res = time::timeout(Duration::from_millis(100), g.run()).await;
        assert_eq!(res.expect("timeout"), Ok(()));
        assert_eq!(
            rec.kinds(),
            vec![
                EventKind::RunStarted,
                EventKind::RunReturned,
                EventKind::CloseStarted,
                EventKind::CloseReturned,
            ]
        );
    }

    #[tokio::test]
    async fn default_close_is_reported_as_skipped() {
        let rec = Recorder::new();
        let g = Group::with_observer(GroupConfig::default(), rec.clone());
        g.always([Arc::new(Basic) as RunnableRef]);

        let res = time::timeout(Duration::from_millis(100), g.run()).await;
        assert_eq!(res.expect("timeout"), Ok(()));
        assert_eq!(
            rec.kinds(),
            vec![
                EventKind::RunStarted,
                EventKind::RunReturned,
                EventKind::CloseStarted,
                EventKind::CloseSkipped,
            ]
        );
    }

    #[tokio::test]
    async fn close_failures_are_logged_not_returned() {
        struct FailingClose;

        #[async_trait]
        impl Runnable for FailingClose {
            fn name(&self) -> &str {
                "failing-close"
            }

            async fn run(&self, _ctx: CancellationToken) -> Result<(), RunError> {
                Err(RunError::failed("run failure"))
            }

            async fn close(&self, _ctx: CancellationToken) -> Result<(), RunError> {
                Err(RunError::failed("close failure"))
            }
        }

        let rec = Recorder::new();
        let g = Group::with_observer(GroupConfig::default(), rec.clone());
        g.always([Arc::new(FailingClose) as RunnableRef]);

        let res = time::timeout(Duration::from_millis(100), g.run()).await;
        assert_eq!(res.expect("timeout"), Err(RunError::failed("run failure")));

        let events = rec.0.lock().unwrap().clone();
        let close_err = events
            .iter()
            .find(|(k, _)| *k == EventKind::CloseReturned)
            .and_then(|(_, e)| e.clone());
        assert_eq!(close_err.as_deref(), Some("close failure"));
    }

    #[tokio::test]
    async fn second_run_finds_nothing_to_do() {
        let g = Group::new(GroupConfig::default());
        g.always([Arc::new(Enriched) as RunnableRef]);
        assert_eq!(g.run().await, Ok(()));
        assert_eq!(g.run().await, Ok(()));
    }
}
