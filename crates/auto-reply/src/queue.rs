//! Single-worker FIFO send queue with randomized inter-send delay.

use std::{future::Future, pin::Pin, time::Duration};

use {
    anyhow::{Result, anyhow},
    rand::Rng,
    tokio::sync::{mpsc, oneshot},
    tracing::error,
};

use lapak_config::RateLimitConfig;

type Action = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

struct Job {
    action: Action,
    done: oneshot::Sender<Result<()>>,
}

/// All outbound sends drain through this queue, one at a time, in enqueue
/// order. When rate limiting is enabled the worker waits a uniform random
/// delay from `[min_ms, max_ms)` *before* each job, spacing consecutive
/// sends. A failed job rejects its caller and the queue moves on; nothing is
/// retried automatically.
pub struct SendQueue {
    tx: mpsc::UnboundedSender<Job>,
}

impl SendQueue {
    /// Spawn the worker task. Must be called within a tokio runtime.
    #[must_use]
    pub fn new(rate: RateLimitConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker(rx, rate));
        Self { tx }
    }

    /// Queue one send. Resolves once the job has run; callers wait on their
    /// own job's completion, never on queue depth.
    pub async fn enqueue<F>(&self, action: F) -> Result<()>
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Job {
                action: Box::pin(action),
                done: done_tx,
            })
            .map_err(|_| anyhow!("send queue worker stopped"))?;
        done_rx
            .await
            .map_err(|_| anyhow!("send queue worker dropped the job"))?
    }
}

async fn worker(mut rx: mpsc::UnboundedReceiver<Job>, rate: RateLimitConfig) {
    while let Some(job) = rx.recv().await {
        if rate.enabled {
            let delay = jitter_ms(rate.min_ms, rate.max_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let result = job.action.await;
        if let Err(e) = &result {
            error!(error = %e, "outbound send failed");
        }
        let _ = job.done.send(result);
    }
}

fn jitter_ms(min: u64, max: u64) -> u64 {
    if max <= min {
        return min;
    }
    rand::rng().random_range(min..max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use {super::*, tokio::time::Instant};

    fn no_rate() -> RateLimitConfig {
        RateLimitConfig {
            enabled: false,
            min_ms: 0,
            max_ms: 0,
        }
    }

    #[tokio::test]
    async fn jobs_complete_in_enqueue_order() {
        let queue = SendQueue::new(no_rate());
        let order: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

        let job = |n: u32| {
            let order = Arc::clone(&order);
            async move {
                order.lock().unwrap().push(n);
                Ok(())
            }
        };
        let (r1, r2, r3) = tokio::join!(
            queue.enqueue(job(1)),
            queue.enqueue(job(2)),
            queue.enqueue(job(3)),
        );
        assert!(r1.is_ok() && r2.is_ok() && r3.is_ok());
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_job_rejects_caller_and_queue_continues() {
        let queue = SendQueue::new(no_rate());

        let failed = queue.enqueue(async { Err(anyhow!("boom")) }).await;
        assert!(failed.is_err());

        let ok = queue.enqueue(async { Ok(()) }).await;
        assert!(ok.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn jitter_spaces_consecutive_jobs_within_bounds() {
        let queue = SendQueue::new(RateLimitConfig {
            enabled: true,
            min_ms: 2500,
            max_ms: 7000,
        });
        let starts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

        let job = || {
            let starts = Arc::clone(&starts);
            async move {
                starts.lock().unwrap().push(Instant::now());
                Ok(())
            }
        };
        let (r1, r2, r3, r4) = tokio::join!(
            queue.enqueue(job()),
            queue.enqueue(job()),
            queue.enqueue(job()),
            queue.enqueue(job()),
        );
        assert!(r1.is_ok() && r2.is_ok() && r3.is_ok() && r4.is_ok());

        let starts = starts.lock().unwrap();
        for pair in starts.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(2500), "gap {gap:?} below minimum");
            assert!(gap < Duration::from_millis(7000), "gap {gap:?} above maximum");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_rate_limit_adds_no_delay() {
        let queue = SendQueue::new(no_rate());
        let before = Instant::now();
        queue.enqueue(async { Ok(()) }).await.unwrap();
        queue.enqueue(async { Ok(()) }).await.unwrap();
        assert_eq!(Instant::now() - before, Duration::ZERO);
    }

    #[test]
    fn jitter_bounds() {
        for _ in 0..100 {
            let v = jitter_ms(2500, 7000);
            assert!((2500..7000).contains(&v));
        }
        assert_eq!(jitter_ms(5000, 5000), 5000);
        assert_eq!(jitter_ms(7000, 2500), 7000);
    }
}
