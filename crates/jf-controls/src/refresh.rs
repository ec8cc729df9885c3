//! Refresh coalescing.

use std::sync::{Arc, Mutex};
use std::thread;

use tracing::trace;

/// Coalesces bursts of refresh requests.
///
/// Blindly running every requested refresh wastes work: only the refresh in
/// flight and one final refresh to pick up whatever changed during it
/// matter. The queue therefore keeps at most one running and one pending
/// refresh; a burst of N enqueues collapses to exactly two callback
/// executions.
pub struct RefreshQueue {
    state: Arc<Mutex<RefreshState>>,
    callback: Arc<dyn Fn() + Send + Sync>,
}

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    queued: bool,
}

impl RefreshQueue {
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(RefreshState::default())),
            callback: Arc::new(callback),
        }
    }

    /// Request a refresh. Runs asynchronously; collapses with any refresh
    /// already running or pending.
    pub fn enqueue(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.refreshing {
                state.queued = true;
                trace!("refresh queued behind in-flight refresh");
                return;
            }
            state.refreshing = true;
            state.queued = false;
        }

        let state = Arc::clone(&self.state);
        let callback = Arc::clone(&self.callback);
        thread::spawn(move || {
            loop {
                callback();
                let mut state = state.lock().unwrap();
                if state.queued {
                    state.queued = false;
                    continue;
                }
                state.refreshing = false;
                return;
            }
        });
    }
}
