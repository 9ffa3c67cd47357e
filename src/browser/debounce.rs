//! Search input debouncing.
//!
//! Each keystroke cancels the pending timer and schedules a new one; only the
//! value that survives the full delay is delivered on the channel.

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::sleep,
};
use tracing::trace;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<String>,
}

impl SearchDebouncer {
    /// Create a debouncer and the receiver of settled search terms.
    ///
    /// `submit` spawns onto the current Tokio runtime.
    #[must_use]
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                pending: None,
                tx,
            },
            rx,
        )
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record the latest input and restart the timer.
    pub fn submit(&mut self, term: impl Into<String>) {
        let term = term.into();
        trace!(%term, "search input");
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(term);
        }));
    }

    /// Drop the pending input without delivering it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
