//! The component contract and a function-backed implementation.
//!
//! This module defines the [`Runnable`] trait (async, cancelable) and a
//! convenient function-backed implementation [`RunFn`]. The common handle
//! type is [`RunnableRef`], an `Arc<dyn Runnable>` suitable for sharing
//! across the runtime.
//!
//! A runnable receives a [`CancellationToken`] that fires once shutdown
//! triggers; components that do not implement [`close`](Runnable::close)
//! must observe it.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::RunError;
use crate::observe::Field;

/// Shared handle to a managed component.
pub type RunnableRef = Arc<dyn Runnable>;

/// A long-lived component managed by a [`Group`](crate::Group).
///
/// Only [`run`](Runnable::run) is mandatory; every other method has a
/// documented default. The provided [`close`](Runnable::close) returns the
/// [`RunError::CloseUnimplemented`] sentinel so the group can tell
/// "relies on cancellation" apart from "closed cleanly".
///
/// Run must not create resources whose cleanup depends solely on `close`
/// being called: if `run` never registers with a group, `close` is never
/// invoked.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use runvisor::{RunError, Runnable};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Runnable for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), RunError> {
///         ctx.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Runnable: Send + Sync + 'static {
    /// Executes the main logic of the component, blocking until it completes
    /// naturally, the cancellation token fires, or [`close`](Runnable::close)
    /// is invoked — whichever the component relies on.
    ///
    /// The token may be ignored by components that implement `close`.
    async fn run(&self, ctx: CancellationToken) -> Result<(), RunError>;

    /// Requests a graceful shutdown. Invoked exactly once per group run,
    /// even after `run` has already returned, so it must be safe then.
    ///
    /// The token fires when the group's close timeout elapses; honor it to
    /// avoid being abandoned mid-teardown.
    ///
    /// The default returns [`RunError::CloseUnimplemented`], which the group
    /// treats as "relies on cancellation" and reports as a skipped close.
    async fn close(&self, _ctx: CancellationToken) -> Result<(), RunError> {
        Err(RunError::CloseUnimplemented)
    }

    /// Cheap, non-blocking readiness probe. Defaults to `true`.
    fn alive(&self) -> bool {
        true
    }

    /// Stable, human-readable component name. Defaults to `"unknown"`.
    fn name(&self) -> &str {
        "unknown"
    }

    /// Metadata attached to every lifecycle event this component produces.
    /// Defaults to none.
    fn fields(&self) -> Vec<Field> {
        Vec::new()
    }
}

/// Function-backed runnable.
///
/// Wraps a closure that *creates* a new future per invocation, so no shared
/// mutable state is needed across the call.
#[derive(Debug)]
pub struct RunFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> RunFn<F> {
    /// Creates a new function-backed runnable.
    ///
    /// Prefer [`RunFn::arc`] when you immediately need a [`RunnableRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the runnable and returns it as a shared handle.
    ///
    /// # Example
    /// ```
    /// use tokio_util::sync::CancellationToken;
    /// use runvisor::{RunError, RunFn, Runnable, RunnableRef};
    ///
    /// let r: RunnableRef = RunFn::arc("hello", |_ctx: CancellationToken| async {
    ///     Ok::<_, RunError>(())
    /// });
    /// assert_eq!(r.name(), "hello");
    /// ```
    pub fn arc<Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), RunError>> + Send + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Runnable for RunFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), RunError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), RunError> {
        (self.f)(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl Runnable for Bare {
        async fn run(&self, _ctx: CancellationToken) -> Result<(), RunError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn defaults_are_harmless_placeholders() {
        let bare = Bare;
        assert_eq!(bare.name(), "unknown");
        assert!(bare.alive());
        assert!(bare.fields().is_empty());
        assert_eq!(
            bare.close(CancellationToken::new()).await,
            Err(RunError::CloseUnimplemented)
        );
    }

    #[tokio::test]
    async fn run_fn_invokes_closure() {
        let r = RunFn::arc("f", |_ctx: CancellationToken| async {
            Err(RunError::failed("boom"))
        });
        assert_eq!(r.name(), "f");
        assert_eq!(
            r.run(CancellationToken::new()).await,
            Err(RunError::failed("boom"))
        );
    }
}
