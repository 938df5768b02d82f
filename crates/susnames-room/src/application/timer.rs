//! Cancellable deferred actions.

use std::time::Duration;

use tokio::task::JoinHandle;

/// An action scheduled to run once after a delay.
///
/// Cancelling before the delay elapses prevents the action from running;
/// cancelling afterwards does nothing. Dropping the handle does not cancel.
#[derive(Debug)]
pub(crate) struct DeferredAction {
    handle: JoinHandle<()>,
}

impl DeferredAction {
    /// Runs `action` on the tokio runtime after `delay`.
    pub fn schedule(delay: Duration, action: impl FnOnce() + Send + 'static) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }
}
