use crate::harness::error::{HarnessError, HarnessResult};
use crate::harness::types::{CancelToken, DispatchSummary, Strategy};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio::task::JoinSet;

impl Strategy {
    /// Schedule `total` invocations of `attempt` and wait for all of them.
    ///
    /// Returns only once every dispatched attempt has finished. The cancel
    /// token is checked before each dispatch; attempts not yet dispatched
    /// when it fires are reported as skipped.
    pub async fn dispatch<F, Fut>(
        &self,
        total: u64,
        attempt: F,
        cancel: &CancelToken,
    ) -> HarnessResult<DispatchSummary>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.validate()?;
        if total == 0 {
            return Ok(DispatchSummary::default());
        }

        match self {
            Strategy::Sequential => Ok(run_sequential(total, &attempt, cancel).await),
            Strategy::BoundedPool { workers } => {
                run_pool(total, *workers, Arc::new(attempt), cancel, None).await
            }
            Strategy::Unbounded { max_in_flight } => {
                run_unbounded(total, *max_in_flight, Arc::new(attempt), cancel).await
            }
            Strategy::RateLimited { per_second, workers } => {
                let rate = NonZeroU32::new(*per_second).unwrap_or(NonZeroU32::MIN);
                let pacer = RateLimiter::direct(Quota::per_second(rate));
                run_pool(total, *workers, Arc::new(attempt), cancel, Some(&pacer)).await
            }
        }
    }
}

async fn run_sequential<F, Fut>(total: u64, attempt: &F, cancel: &CancelToken) -> DispatchSummary
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut dispatched = 0;
    while dispatched < total && !cancel.is_cancelled() {
        attempt().await;
        dispatched += 1;
    }

    DispatchSummary {
        dispatched,
        skipped: total - dispatched,
    }
}

/// Fixed set of workers pulling attempt tickets from a bounded queue.
///
/// The queue holds at most one ticket per worker, so the dispatcher blocks
/// while every worker is busy.
async fn run_pool<F, Fut>(
    total: u64,
    workers: usize,
    attempt: Arc<F>,
    cancel: &CancelToken,
    pacer: Option<&DefaultDirectRateLimiter>,
) -> HarnessResult<DispatchSummary>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let workers = workers.min(usize::try_from(total).unwrap_or(usize::MAX)).max(1);
    let (tx, rx) = mpsc::channel::<u64>(workers);
    let rx = Arc::new(Mutex::new(rx));

    let mut pool = JoinSet::new();
    for _ in 0..workers {
        let rx = rx.clone();
        let attempt = attempt.clone();
        pool.spawn(async move {
            loop {
                let ticket = rx.lock().await.recv().await;
                if ticket.is_none() {
                    break;
                }
                attempt().await;
            }
        });
    }

    let mut dispatched = 0;
    while dispatched < total && !cancel.is_cancelled() {
        if let Some(pacer) = pacer {
            pacer.until_ready().await;
        }
        if tx.send(dispatched).await.is_err() {
            // Every worker is gone; the join below reports why
            break;
        }
        dispatched += 1;
    }

    // No more work: workers drain what is queued, then exit
    drop(tx);
    while let Some(joined) = pool.join_next().await {
        joined?;
    }

    Ok(DispatchSummary {
        dispatched,
        skipped: total - dispatched,
    })
}

async fn run_unbounded<F, Fut>(
    total: u64,
    max_in_flight: Option<usize>,
    attempt: Arc<F>,
    cancel: &CancelToken,
) -> HarnessResult<DispatchSummary>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let ceiling = max_in_flight.map(|limit| Arc::new(Semaphore::new(limit)));
    let mut tasks = JoinSet::new();

    let mut dispatched = 0;
    while dispatched < total && !cancel.is_cancelled() {
        let permit = match &ceiling {
            Some(ceiling) => Some(
                ceiling
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|e| HarnessError::WorkerFailed(e.to_string()))?,
            ),
            None => None,
        };

        let attempt = attempt.clone();
        tasks.spawn(async move {
            attempt().await;
            drop(permit);
        });
        dispatched += 1;
    }

    while let Some(joined) = tasks.join_next().await {
        joined?;
    }

    Ok(DispatchSummary {
        dispatched,
        skipped: total - dispatched,
    })
}
