//! Response models for the gateway API
//!
//! Defines the DTOs (Data Transfer Objects) serialized into HTTP response
//! bodies. Request bodies reuse domain types such as
//! [`AnalyticsEvent`](crate::analytics::AnalyticsEvent).

pub mod responses;

// Re-export commonly used types
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, ProxyResponse, StatsResponse, TrackResponse,
};
