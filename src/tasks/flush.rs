//! Periodic Analytics Flush Task
//!
//! Bounds how long an event can sit in the queue during quiet periods, and
//! retries batches that failed on an earlier attempt.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::analytics::{EventQueue, FlushOutcome};

/// Spawns a task that calls [`EventQueue::flush`] every `interval`.
///
/// A tick that lands while another flush is in flight is simply skipped.
/// There is no cap on how many ticks a failing batch is retried for.
pub fn spawn_flush_task(queue: EventQueue, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting analytics flush task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            match queue.flush().await {
                FlushOutcome::Sent(count) => debug!("Periodic flush sent {} events", count),
                FlushOutcome::Requeued(count) => {
                    debug!("Periodic flush failed, {} events kept for the next tick", count)
                }
                FlushOutcome::Skipped => {}
            }
        }
    })
}
