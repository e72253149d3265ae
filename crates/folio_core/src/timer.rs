//! Single-slot cancellable timer
//!
//! A [`Timer`] owns at most one pending task. Scheduling a new callback aborts
//! whatever was pending, so the last call always wins. State machines that need
//! "restart the countdown on every change" semantics (mascot revert, console
//! auto-minimize, boot script) each own one of these.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
pub struct Timer {
    inner: Arc<TimerInner>,
}

#[derive(Default)]
struct TimerInner {
    pending: Mutex<Option<JoinHandle<()>>>,
    generation: AtomicU64,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` after `delay`, cancelling anything already scheduled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_async(delay, async move { callback() });
    }

    /// Like [`Timer::schedule`] but the body is a future, so it may await
    /// further delays of its own.
    pub fn schedule_async<Fut>(&self, delay: Duration, body: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A racing schedule() on another worker may have bumped the generation
            // after we woke but before abort() landed.
            let current = match inner.upgrade() {
                Some(inner) => inner.generation.load(Ordering::SeqCst),
                None => return,
            };
            if current == generation {
                body.await;
            }
        });

        if let Some(previous) = self.inner.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Drop the pending callback, if any.
    pub fn cancel(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = self.inner.pending.lock().take() {
            previous.abort();
        }
    }

    /// True while a callback is scheduled and has not finished.
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_last_schedule_wins() {
        let timer = Timer::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for value in [1, 10, 100] {
            let hits = hits.clone();
            timer.schedule(Duration::from_millis(50), move || {
                hits.fetch_add(value, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 100);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_callback() {
        let timer = Timer::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        timer.schedule(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(timer.is_pending());

        timer.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
