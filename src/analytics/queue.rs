//! Event Queue Module
//!
//! Buffers analytics events in memory and ships them to an [`EventSink`] in
//! bounded batches. Producers never wait on, or see failures from, the sink.
//!
//! Flushing is a two-state machine:
//!
//! | state    | trigger                               | next     |
//! |----------|---------------------------------------|----------|
//! | Idle     | enqueue reaching the batch size       | Flushing |
//! | Idle     | timer tick with a non-empty queue     | Flushing |
//! | Flushing | any trigger                           | Flushing (ignored) |
//! | Flushing | send completes (success or failure)   | Idle     |
//!
//! A failed batch goes back to the head of the queue in its original order,
//! ahead of anything enqueued while it was in flight.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::{AnalyticsEvent, EventSink};

// == Public Constants ==
/// Events per batch, and the queue length that triggers an early flush
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Seconds between periodic flushes
pub const DEFAULT_FLUSH_INTERVAL_SECS: u64 = 30;

// == Queue Config ==
#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub batch_size: usize,
    pub flush_interval: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: Duration::from_secs(DEFAULT_FLUSH_INTERVAL_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushPhase {
    Idle,
    Flushing,
}

/// What a call to [`EventQueue::flush`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Another flush was in flight, or there was nothing to send
    Skipped,
    /// This many events were delivered and discarded
    Sent(usize),
    /// Delivery failed; this many events went back to the head of the queue
    Requeued(usize),
}

#[derive(Debug)]
struct QueueState {
    events: VecDeque<AnalyticsEvent>,
    phase: FlushPhase,
}

struct Inner {
    state: Mutex<QueueState>,
    sink: Arc<dyn EventSink>,
    batch_size: usize,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // The state is a plain queue plus a flag; it stays usable after a panic
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Event Queue ==
/// Shared handle to the batching analytics queue. Clones refer to the same
/// queue.
#[derive(Clone)]
pub struct EventQueue {
    inner: Arc<Inner>,
}

impl EventQueue {
    // == Constructor ==
    pub fn new(sink: Arc<dyn EventSink>, config: &QueueConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(QueueState {
                    events: VecDeque::new(),
                    phase: FlushPhase::Idle,
                }),
                sink,
                batch_size: config.batch_size.max(1),
            }),
        }
    }

    // == Track Event ==
    /// Appends an event to the tail of the queue.
    ///
    /// When the queue reaches the batch size a flush is spawned on the current
    /// tokio runtime; outside a runtime the periodic timer picks it up instead.
    pub fn track_event(&self, event: AnalyticsEvent) {
        let should_flush = {
            let mut state = self.inner.lock();
            state.events.push_back(event);
            state.events.len() >= self.inner.batch_size && state.phase == FlushPhase::Idle
        };

        if should_flush {
            self.trigger_flush();
        }
    }

    pub fn track_page_view(&self, path: &str) {
        self.track_event(AnalyticsEvent::new("Navigation", "page_view").with_label(path));
    }

    pub fn track_equipment_view(&self, equipment_id: &str, name: &str) {
        self.track_event(
            AnalyticsEvent::new("Equipment", "view").with_label(format!("{} ({})", name, equipment_id)),
        );
    }

    pub fn track_search(&self, query: &str, results: usize) {
        self.track_event(
            AnalyticsEvent::new("Search", "search")
                .with_label(query)
                .with_value(results as f64),
        );
    }

    pub fn track_booking(&self, equipment_id: &str, total: f64) {
        self.track_event(
            AnalyticsEvent::new("Rental", "booking_created")
                .with_label(equipment_id)
                .with_value(total),
        );
    }

    pub fn track_review(&self, equipment_id: &str, rating: u8) {
        self.track_event(
            AnalyticsEvent::new("Review", "review_submitted")
                .with_label(equipment_id)
                .with_value(f64::from(rating)),
        );
    }

    pub fn track_sign_up(&self, method: &str) {
        self.track_event(AnalyticsEvent::new("User", "sign_up").with_label(method));
    }

    /// Records an application error. Error events are non-interaction.
    pub fn track_error(&self, message: &str, fatal: bool) {
        let action = if fatal { "fatal_error" } else { "error" };
        self.track_event(
            AnalyticsEvent::new("Error", action)
                .with_label(message)
                .non_interaction(),
        );
    }

    // == Flush ==
    /// Sends up to one batch from the head of the queue.
    ///
    /// Never returns an error: a failed send is logged and the batch is put
    /// back for the next attempt.
    pub async fn flush(&self) -> FlushOutcome {
        let Some(batch) = self.begin_flush() else {
            return FlushOutcome::Skipped;
        };

        let result = self.inner.sink.send(&batch.events).await;
        match result {
            Ok(()) => {
                let sent = batch.complete();
                debug!("Flushed {} analytics events", sent);
                FlushOutcome::Sent(sent)
            }
            Err(err) => {
                let count = batch.events.len();
                drop(batch);
                warn!(error = %err, "Analytics flush failed, {} events requeued", count);
                FlushOutcome::Requeued(count)
            }
        }
    }

    /// Flushes batch after batch until the queue is empty or a send fails.
    /// Used on shutdown.
    pub async fn drain(&self) -> usize {
        let mut sent = 0;
        while let FlushOutcome::Sent(count) = self.flush().await {
            sent += count;
        }
        sent
    }

    /// Number of events waiting to be sent, excluding any batch in flight.
    pub fn pending(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn batch_size(&self) -> usize {
        self.inner.batch_size
    }

    fn trigger_flush(&self) {
        match Handle::try_current() {
            Ok(handle) => {
                let queue = self.clone();
                handle.spawn(async move {
                    queue.flush().await;
                });
            }
            Err(_) => debug!("No async runtime; deferring flush to the periodic timer"),
        }
    }

    /// Moves Idle -> Flushing and takes a batch off the head, or returns None
    /// if a flush is already running or there is nothing queued.
    fn begin_flush(&self) -> Option<InFlightBatch<'_>> {
        let mut state = self.inner.lock();
        if state.phase == FlushPhase::Flushing || state.events.is_empty() {
            return None;
        }

        state.phase = FlushPhase::Flushing;
        let take = state.events.len().min(self.inner.batch_size);
        let events = state.events.drain(..take).collect();

        Some(InFlightBatch {
            inner: self.inner.as_ref(),
            events,
        })
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("batch_size", &self.inner.batch_size)
            .field("pending", &self.pending())
            .finish()
    }
}

// == In-Flight Batch ==
/// A batch removed from the queue while its send is pending.
///
/// Dropping it returns any remaining events to the head of the queue and
/// moves the queue back to Idle. This covers failed sends as well as a flush
/// future that is cancelled mid-send.
struct InFlightBatch<'a> {
    inner: &'a Inner,
    events: Vec<AnalyticsEvent>,
}

impl InFlightBatch<'_> {
    /// Marks the batch delivered. Returns how many events it held.
    fn complete(mut self) -> usize {
        let count = self.events.len();
        self.events.clear();
        count
    }
}

impl Drop for InFlightBatch<'_> {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        for event in self.events.drain(..).rev() {
            state.events.push_front(event);
        }
        state.phase = FlushPhase::Idle;
    }
}
