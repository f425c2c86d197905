//! Cancellable delayed actions.
//!
//! [`Debouncer`] runs an action after a quiet period. Scheduling again
//! before the period elapses cancels the pending action and starts the
//! period over, so a burst of calls commits only the last one.
//!
//! Actions are synchronous closures. A pending task is aborted only while
//! it sleeps; once the delay has elapsed the action runs to completion
//! without yielding, so cancellation never leaves a half-applied effect.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one pending action after a fixed delay.
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period before an action commits.
    delay: Duration,
    /// The task holding the currently pending action, if any.
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Return the quiet period.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` to run after the quiet period, cancelling any
    /// action still pending.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Cancel the pending action. Returns `true` if one was still waiting.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.take().is_some_and(|handle| {
            let waiting = !handle.is_finished();
            handle.abort();
            waiting
        })
    }

    /// Whether an action is scheduled and has not run yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let pending = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
