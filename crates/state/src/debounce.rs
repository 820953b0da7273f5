//! Trailing debounce: coalesce a burst of schedule calls into one run.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

/// Runs a deferred action once per burst.
///
/// The first [`schedule`](Debouncer::schedule) of a burst arms a timer;
/// further schedules while the timer is armed are dropped. The action runs
/// `delay` after arming, and the debouncer re-arms only after the action has
/// completed, so whatever state the action reads is the state at run time,
/// not at schedule time.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Arc<AtomicBool>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Schedule `run` for the end of the current burst window. A no-op when a
    /// run is already pending.
    pub fn schedule<F>(&self, run: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.pending.swap(true, Ordering::SeqCst) {
            return;
        }
        let pending = Arc::clone(&self.pending);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            run();
            pending.store(false, Ordering::SeqCst);
        });
    }

    /// Whether a run is currently armed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_coalesces_into_one_run() {
        let debouncer = Debouncer::new(Duration::from_secs(5));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(move || {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearms_after_run() {
        let debouncer = Debouncer::new(Duration::from_secs(5));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let runs = Arc::clone(&runs);
            debouncer.schedule(move || {
                runs.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_secs(6)).await;
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_run_before_delay_elapses() {
        let debouncer = Debouncer::new(Duration::from_secs(5));
        let runs = Arc::new(AtomicUsize::new(0));

        {
            let runs = Arc::clone(&runs);
            debouncer.schedule(move || {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
