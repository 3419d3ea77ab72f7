//! Rental Edge - resilience layer for an equipment-rental marketplace
//!
//! Memoizes remote lookups in a TTL cache, batches analytics events to a
//! remote sink, and wraps calls to the backend API with timeout, retry and
//! centralized error handling.

pub mod analytics;
pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_cleanup_task, spawn_flush_task};
