//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for proxied, cached lookups (GET /equipment...)
#[derive(Debug, Clone, Serialize)]
pub struct ProxyResponse {
    /// Cache key the data is stored under
    pub key: String,
    /// Whether the data came from the cache
    pub cached: bool,
    /// The upstream payload
    pub data: Value,
}

impl ProxyResponse {
    pub fn new(key: impl Into<String>, cached: bool, data: Value) -> Self {
        Self {
            key: key.into(),
            cached,
            data,
        }
    }
}

/// Response body for POST /events
#[derive(Debug, Clone, Serialize)]
pub struct TrackResponse {
    pub message: String,
    /// Events waiting to be flushed, including this one unless a flush
    /// already picked it up
    pub queued: usize,
}

impl TrackResponse {
    pub fn new(queued: usize) -> Self {
        Self {
            message: "Event queued".to_string(),
            queued,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Entries dropped by this call
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cache cleared ({} entries removed)", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries dropped after their TTL elapsed
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Analytics events not yet flushed
    pub pending_events: usize,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, pending_events: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            pending_events,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
