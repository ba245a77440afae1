//! OS termination signal listener.
//!
//! [`Signals`] blocks until the process receives one of the configured
//! signals or the group's cancellation fires. A received signal surfaces as
//! [`RunError::Signal`] identifying which one, so callers can distinguish it
//! from other shutdown causes without string comparison.
//!
//! ## Signals
//! **Unix platforms:** any subset of SIGINT / SIGTERM / SIGQUIT / SIGHUP.
//!
//! **Other platforms:** Ctrl-C via [`tokio::signal::ctrl_c`], surfaced as
//! [`Signal::Interrupt`].

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{RunError, Signal};
use crate::runnable::Runnable;

/// Runnable that completes on an OS termination signal.
///
/// Registered as a regular (non-sidecar) member it turns the first received
/// signal into the group-wide shutdown trigger.
pub struct Signals {
    kinds: Vec<Signal>,
}

impl Signals {
    /// Listens for the given signals. An empty set falls back to the
    /// conventional termination set, same as [`Signals::terminal`].
    pub fn new(kinds: impl Into<Vec<Signal>>) -> Self {
        let mut kinds = kinds.into();
        if kinds.is_empty() {
            kinds = vec![Signal::Interrupt, Signal::Terminate, Signal::Quit];
        }
        Self { kinds }
    }

    /// Listens for SIGINT, SIGTERM and SIGQUIT.
    pub fn terminal() -> Self {
        Self::new(Vec::new())
    }

    #[cfg(unix)]
    async fn wait(&self, ctx: &CancellationToken) -> Result<(), RunError> {
        use tokio::signal::unix::{signal, SignalKind};

        let mut streams = Vec::with_capacity(self.kinds.len());
        for kind in &self.kinds {
            let sk = match kind {
                Signal::Interrupt => SignalKind::interrupt(),
                Signal::Terminate => SignalKind::terminate(),
                Signal::Quit => SignalKind::quit(),
                Signal::Hangup => SignalKind::hangup(),
            };
            let stream = signal(sk)
                .map_err(|e| RunError::failed(format!("register handler for {kind}: {e}")))?;
            streams.push((stream, *kind));
        }

        let waits: Vec<_> = streams
            .iter_mut()
            .map(|(stream, kind)| {
                let kind = *kind;
                Box::pin(async move {
                    stream.recv().await;
                    kind
                })
            })
            .collect();

        tokio::select! {
            (signal, _, _) = futures::future::select_all(waits) => {
                Err(RunError::Signal { signal })
            }
            _ = ctx.cancelled() => Err(RunError::Canceled),
        }
    }

    #[cfg(not(unix))]
    async fn wait(&self, ctx: &CancellationToken) -> Result<(), RunError> {
        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => Err(RunError::Signal { signal: Signal::Interrupt }),
                Err(e) => Err(RunError::failed(format!("register ctrl-c handler: {e}"))),
            },
            _ = ctx.cancelled() => Err(RunError::Canceled),
        }
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::terminal()
    }
}

#[async_trait]
impl Runnable for Signals {
    fn name(&self) -> &str {
        "signal listener"
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), RunError> {
        self.wait(&ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancellation_beats_signal_wait() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let listener = Signals::terminal();
        assert_eq!(listener.run(ctx).await, Err(RunError::Canceled));
    }

    #[test]
    fn empty_set_falls_back_to_terminal_signals() {
        let listener = Signals::new(Vec::new());
        assert_eq!(
            listener.kinds,
            vec![Signal::Interrupt, Signal::Terminate, Signal::Quit]
        );
    }
}
