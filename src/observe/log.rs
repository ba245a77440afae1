//! LogWriter — line-delimited `key=value` event printer.
//!
//! The default observer sink: one line per lifecycle event on stdout.
//!
//! ## Example output
//! ```text
//! seq=1 event=run_started name="api server" port=8080
//! seq=2 event=run_started name="signal listener"
//! seq=3 event=run_returned name="signal listener" error="received signal SIGTERM"
//! seq=4 event=close_started name="api server" port=8080
//! seq=5 event=close_returned name="api server" port=8080
//! seq=6 event=close_skipped name="signal listener"
//! ```

use std::fmt::Write as _;

use super::event::Event;
use super::observer::Observe;

/// Structured event writer for stdout.
#[derive(Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Constructs a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Observe for LogWriter {
    fn on_event(&self, ev: &Event) {
        let mut line = format!(
            "seq={} event={} name={:?}",
            ev.seq,
            ev.kind.as_label(),
            ev.runnable
        );
        for field in &ev.fields {
            let _ = write!(line, " {}={}", field.key, field.value);
        }
        if let Some(error) = &ev.error {
            let _ = write!(line, " error={error:?}");
        }
        println!("{line}");
    }
}
