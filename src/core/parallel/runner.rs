//! Bounded concurrent batch runner.
//!
//! Fans a batch of independent jobs out across at most
//! `ParallelConfig::max_concurrent_jobs` concurrent tasks, using a
//! `tokio::sync::Semaphore` permit per in-flight job — the minimal
//! generalization of the teacher's worker-pool pattern this crate needs:
//! each task owns one fully independent unit of work end to end, with no
//! shared mutable state or cross-job scheduling.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::parallel::config::ParallelConfig;

/// Runs `make_job(item)` for every item in `items`, at most
/// `config.max_concurrent_jobs` at a time, and returns the results in
/// submission order.
///
/// `F` is cloned per item (cheap for an `Arc`-wrapping closure or function
/// pointer); each job's future is spawned onto its own `tokio` task so a
/// panicking job cannot take the whole batch down silently.
pub async fn run_batch<T, R, F, Fut>(config: &ParallelConfig, items: Vec<T>, make_job: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let permits = config.max_concurrent_jobs.max(1);
    let semaphore = Arc::new(Semaphore::new(permits));
    let make_job = Arc::new(make_job);

    let mut set = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let make_job = Arc::clone(&make_job);
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            (index, make_job(item).await)
        });
    }

    let mut results: Vec<Option<R>> = Vec::new();
    while let Some(joined) = set.join_next().await {
        if let Ok((index, result)) = joined {
            if results.len() <= index {
                results.resize_with(index + 1, || None);
            }
            results[index] = Some(result);
        }
    }

    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn runs_all_items_and_preserves_order() {
        let config = ParallelConfig { max_concurrent_jobs: 2 };
        let items = vec![1, 2, 3, 4, 5];
        let results = run_batch(&config, items, |n| async move { n * 10 }).await;
        assert_eq!(results, vec![10, 20, 30, 40, 50]);
    }

    #[tokio::test]
    async fn respects_concurrency_cap() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let config = ParallelConfig { max_concurrent_jobs: 2 };
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..8).collect();
        let in_flight_cloned = Arc::clone(&in_flight);
        let max_seen_cloned = Arc::clone(&max_seen);

        let _ = run_batch(&config, items, move |_| {
            let in_flight = Arc::clone(&in_flight_cloned);
            let max_seen = Arc::clone(&max_seen_cloned);
            async move {
                let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(current, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert!(max_seen.load(Ordering::SeqCst) <= 2);
    }
}
