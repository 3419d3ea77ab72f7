//! Analytics Module
//!
//! Decouples frequent event production from infrequent, fallible delivery.
//! Events are queued in memory only; anything still queued when the process
//! exits is lost.

mod event;
mod queue;
mod sink;

pub use event::AnalyticsEvent;
pub use queue::{
    EventQueue, FlushOutcome, QueueConfig, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL_SECS,
};
pub use sink::{EventSink, HttpEventSink, SinkError};
