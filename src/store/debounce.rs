use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Debounced commit scheduler. Holds the last pending value and a
/// cancel handle so a newer write always supersedes an older one;
/// `flush_now` bypasses the timer entirely.
pub struct Debouncer<T: Clone + Send + 'static> {
    delay: Duration,
    commit: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, commit: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            commit: Arc::new(commit),
            pending: None,
        }
    }

    /// Restart the delay timer with a new value. Any value still
    /// waiting is discarded. A zero delay commits on the next timer
    /// tick.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        let commit = Arc::clone(&self.commit);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            commit(value);
        }));
    }

    /// Commit immediately, discarding any pending value.
    pub fn flush_now(&mut self, value: T) {
        self.cancel();
        (self.commit)(value);
    }

    /// Drop the pending value without committing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T: Clone + Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
