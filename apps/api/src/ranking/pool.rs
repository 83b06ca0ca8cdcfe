//! Bounded worker pool for batch assessment.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

/// Runs `task` over `items` with at most `concurrency` tasks in flight.
///
/// The output is in input order. A task that panics loses only its own slot
/// (`None`); every other result is still returned.
pub async fn map_bounded<I, O, F, Fut>(items: Vec<I>, concurrency: usize, task: F) -> Vec<Option<O>>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = O> + Send + 'static,
{
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set = JoinSet::new();
    let mut slots: Vec<Option<O>> = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        slots.push(None);
        let permits = permits.clone();
        let fut = task(item);
        join_set.spawn(async move {
            // The semaphore is never closed, so acquire only fails if it were.
            let _permit = permits.acquire_owned().await.ok();
            (index, fut.await)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, output)) => slots[index] = Some(output),
            Err(e) => error!("Worker task aborted: {}", e),
        }
    }

    slots
}
