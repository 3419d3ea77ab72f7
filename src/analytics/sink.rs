//! Event Sink Module
//!
//! The remote end of the analytics pipeline. The queue only knows the
//! [`EventSink`] trait; [`HttpEventSink`] is the production implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::AnalyticsEvent;

// == Sink Error ==
/// Any failure while transmitting a batch.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Transport-level failure
    #[error("Failed to reach analytics endpoint: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("Analytics endpoint returned status {0}")]
    Rejected(u16),
}

// == Event Sink ==
/// Destination for flushed batches.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Transmits one batch. Any error leaves the batch for a later retry.
    async fn send(&self, events: &[AnalyticsEvent]) -> Result<(), SinkError>;
}

#[derive(Serialize)]
struct BatchBody<'a> {
    events: &'a [AnalyticsEvent],
}

// == HTTP Event Sink ==
/// POSTs `{ "events": [...] }` to a single analytics endpoint.
#[derive(Debug, Clone)]
pub struct HttpEventSink {
    client: Client,
    endpoint: String,
}

impl HttpEventSink {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn send(&self, events: &[AnalyticsEvent]) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&BatchBody { events })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected(status.as_u16()));
        }

        debug!("Delivered {} analytics events to {}", events.len(), self.endpoint);
        Ok(())
    }
}
