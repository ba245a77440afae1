//! Minimal end-to-end demo: a worker, a periodic ticker, and a signal
//! listener under one group. Ctrl-C tears everything down deterministically.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use runvisor::runnables::{Signals, Ticker};
use runvisor::{Group, GroupConfig, RunError, RunFn, RunnableRef};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), RunError> {
    let group = Group::new(GroupConfig {
        close_timeout: Duration::from_secs(5),
        ..GroupConfig::default()
    });

    let worker: RunnableRef = RunFn::arc("worker", |ctx: CancellationToken| async move {
        while !ctx.is_cancelled() {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        Ok(())
    });

    let ticker: RunnableRef = Arc::new(Ticker::new(Duration::from_secs(1), || {
        println!("tick");
    }));

    let signals: RunnableRef = Arc::new(Signals::terminal());

    group.always([worker, ticker, signals]);
    group.run().await
}
