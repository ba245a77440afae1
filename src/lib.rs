//! # runvisor
//!
//! **Runvisor** is a component-lifecycle orchestrator with deterministic
//! teardown. It runs a set of independent long-lived components
//! concurrently, detects the first one that signals the program should stop,
//! propagates shutdown to every other component, and waits — exactly once —
//! for all of them to finish before returning the triggering error.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   Runnable   │   │   Runnable   │   │   Runnable   │
//!     │ (api server) │   │ (sig listen) │   │  (sidecar)   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  Group                                                        │
//! │  - wraps each runnable into an actor (execute + interrupt)    │
//! │  - reports phase transitions to the Observe sink              │
//! │  - aggregates liveness across all runnables                   │
//! └──────┬──────────────────┬──────────────────┬──────────────────┘
//!        ▼                  ▼                  ▼
//!   tokio::spawn       tokio::spawn       tokio::spawn
//!        │                  │                  │
//!        └────── completion channel (sized to actor count) ───────┐
//!                                                                 ▼
//!               first qualifying completion = authoritative error
//!                                │
//!                token.cancel() ─┴─► interrupt every actor once
//!                                    (concurrent, or registration order)
//!                                    bounded by close_timeout
//! ```
//!
//! ## Lifecycle
//! ```text
//! Idle ──run()──► Running ──trigger──► Interrupting ──► Terminated
//!
//! Trigger rule:
//!   regular runnable returns      → always a trigger
//!   sidecar returns Ok            → job done, group keeps running
//!   sidecar returns Err           → trigger
//!   every sidecar done, Ok        → clean terminal condition
//! ```
//!
//! ## Features
//! | Area             | Description                                              | Key types / traits            |
//! |------------------|----------------------------------------------------------|-------------------------------|
//! | **Contract**     | What a managed component must provide.                   | [`Runnable`], [`RunFn`]       |
//! | **Orchestration**| Run-all / detect-first-exit / interrupt-all / wait-all.  | [`Group`], [`GroupConfig`]    |
//! | **Errors**       | Typed causes, one authoritative error per run.           | [`RunError`], [`Signal`]      |
//! | **Observability**| Per-runnable phase events with typed metadata.           | [`Observe`], [`Event`], [`Field`] |
//! | **Runnables**    | Signal listener, parent watcher, ticker, reaper.         | [`runnables`]                 |
//!
//! ## Optional features
//! - `logging` *(default)*: exports [`LogWriter`], the line-delimited
//!   `key=value` stdout sink used when no observer is injected.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use runvisor::{Group, GroupConfig, RunError, RunFn, RunnableRef};
//! use runvisor::runnables::Signals;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), RunError> {
//!     let group = Group::new(GroupConfig {
//!         close_timeout: Duration::from_secs(10),
//!         ..GroupConfig::default()
//!     });
//!
//!     // A worker that relies on the shared cancellation token.
//!     let worker: RunnableRef = RunFn::arc("worker", |ctx: CancellationToken| async move {
//!         while !ctx.is_cancelled() {
//!             tokio::time::sleep(Duration::from_millis(250)).await;
//!         }
//!         Ok(())
//!     });
//!
//!     let signals: RunnableRef = Arc::new(Signals::terminal());
//!     group.always([worker, signals]);
//!
//!     // Blocks until a signal (or worker failure), then tears down.
//!     group.run().await
//! }
//! ```
//!
//! ## Teardown guarantees
//! - `run` and `close` are each invoked **exactly once** per runnable per run
//! - exactly one **authoritative error** crosses the group boundary; close
//!   failures are observable only through the [`Observe`] sink
//! - `close_timeout` bounds only the group's *wait*: a component that ignores
//!   both its token and its close call keeps running detached after `run`
//!   returns (documented resource-leak tradeoff — there is no preemption)

mod config;
mod core;
mod error;
mod observe;
mod runnable;

pub mod runnables;

// ---- Public re-exports ----

pub use config::GroupConfig;
pub use core::Group;
pub use error::{RunError, Signal};
pub use observe::{Event, EventKind, Field, FieldValue, Observe};
pub use runnable::{RunFn, Runnable, RunnableRef};

// Optional: expose the built-in stdout sink.
// Enabled by default; opt out with `default-features = false`.
#[cfg(feature = "logging")]
pub use observe::LogWriter;
