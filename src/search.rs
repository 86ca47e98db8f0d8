//! Debounced search text.
//!
//! Typing updates the text immediately, but a search only fires once the
//! text has been stable for the configured timeout, and only when it differs
//! from the last search that fired.
//!
//! # Usage
//!
//! ```ignore
//! let (search, mut searches) = SearchService::start(Duration::from_millis(300));
//! search.set_text("moon");
//! while let Some(text) = searches.recv().await {
//!     controller.handle(CollectionEvent::SearchTextChanged(text)).await;
//! }
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Default)]
struct SearchState {
    search_text: String,
    last_search_text: String,
}

/// Handle to the search debouncer.
///
/// Dropping every handle stops the background task.
#[derive(Debug, Clone)]
pub struct SearchService {
    state: Arc<Mutex<SearchState>>,
    restart_tx: mpsc::UnboundedSender<()>,
}

impl SearchService {
    /// Spawn the debouncer. Fired searches arrive on the returned receiver.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let state = Arc::new(Mutex::new(SearchState::default()));
        let (restart_tx, restart_rx) = mpsc::unbounded_channel();
        let (search_tx, search_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(Arc::clone(&state), timeout, restart_rx, search_tx));

        (Self { state, restart_tx }, search_rx)
    }

    /// Update the search text.
    ///
    /// Changes that only add or remove surrounding whitespace do not restart
    /// the timer.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        let changed = {
            let mut state = self.state.lock();
            let changed = state.search_text.trim() != text.trim();
            state.search_text = text;
            changed
        };

        if changed {
            // The task only stops once every handle is gone
            let _ = self.restart_tx.send(());
        }
    }

    /// The text as typed.
    pub fn search_text(&self) -> String {
        self.state.lock().search_text.clone()
    }

    /// The text of the last search that fired.
    pub fn last_search_text(&self) -> String {
        self.state.lock().last_search_text.clone()
    }
}

async fn run(
    state: Arc<Mutex<SearchState>>,
    timeout: Duration,
    mut restart_rx: mpsc::UnboundedReceiver<()>,
    search_tx: mpsc::UnboundedSender<String>,
) {
    let timer = sleep_until(Instant::now());
    tokio::pin!(timer);
    let mut armed = false;

    loop {
        tokio::select! {
            restart = restart_rx.recv() => {
                match restart {
                    Some(()) => {
                        timer.as_mut().reset(Instant::now() + timeout);
                        armed = true;
                    }
                    None => break,
                }
            }

            _ = &mut timer, if armed => {
                armed = false;
                let fired = {
                    let mut state = state.lock();
                    if state.search_text != state.last_search_text {
                        state.last_search_text = state.search_text.clone();
                        Some(state.search_text.clone())
                    } else {
                        None
                    }
                };

                if let Some(text) = fired {
                    tracing::debug!(target: "search", text = %text, "Search fired");
                    if search_tx.send(text).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
