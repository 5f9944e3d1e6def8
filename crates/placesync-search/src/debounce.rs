//! Trailing-edge debounce for keystroke-driven searches.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet period before a scheduled search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces a burst of keyword changes into a single action.
///
/// Every [`schedule`](Self::schedule) call cancels the pending timer and arms
/// a new one, so only the last action of a burst fires, after `delay` of
/// quiet. Dropping the debouncer cancels whatever is still pending.
///
/// Timers are Tokio tasks: `schedule` must be called from within a Tokio
/// runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action` to run with `keyword` once the quiet period elapses.
    ///
    /// A blank keyword skips the timer: the pending action is cancelled and
    /// `action` runs immediately, on the caller's stack, with an empty string.
    pub fn schedule<F>(&self, keyword: &str, action: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        if keyword.trim().is_empty() {
            drop(pending);
            action(String::new());
            return;
        }

        let delay = self.delay;
        let keyword = keyword.to_string();
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(keyword);
        }));
    }

    /// Cancel the pending action, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.lock_pending().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
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
