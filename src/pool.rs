//! Bounded-concurrency execution of transfer tasks

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Run one future per item with at most `workers` in flight
///
/// A worker count of zero is clamped to one so a misconfigured pool still
/// makes progress. Results come back in completion order.
pub(crate) async fn run_tasks<I, F, Fut, T>(items: I, workers: usize, task: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    stream::iter(items)
        .map(task)
        .buffer_unordered(workers.max(1))
        .collect()
        .await
}
