//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::analytics::{QueueConfig, DEFAULT_BATCH_SIZE, DEFAULT_FLUSH_INTERVAL_SECS};
use crate::cache::DEFAULT_TTL_SECS;
use crate::client::{ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS};

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;
const DEFAULT_API_BASE_URL: &str = "http://localhost:54321/rest/v1";
const DEFAULT_ANALYTICS_ENDPOINT: &str = "http://localhost:54321/functions/v1/analytics";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default cache TTL in seconds
    pub cache_default_ttl: u64,
    /// Background cache sweep interval in seconds
    pub cleanup_interval: u64,
    /// Base URL of the remote API
    pub api_base_url: String,
    /// Bearer token for the remote API, if any
    pub api_token: Option<String>,
    /// Per-attempt request timeout in seconds
    pub api_timeout: u64,
    /// Retries allowed after a timed-out attempt
    pub api_max_retries: u32,
    /// Delay between retries in milliseconds
    pub api_retry_delay_ms: u64,
    /// Endpoint receiving analytics batches
    pub analytics_endpoint: String,
    /// Events per analytics batch
    pub analytics_batch_size: usize,
    /// Periodic analytics flush interval in seconds
    pub analytics_flush_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DEFAULT_TTL` - Default cache TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 60)
    /// - `API_BASE_URL` - Remote API base URL
    /// - `API_TOKEN` - Bearer token (default: none)
    /// - `API_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `API_MAX_RETRIES` - Retries on timeout (default: 3)
    /// - `API_RETRY_DELAY_MS` - Delay between retries (default: 1000)
    /// - `ANALYTICS_ENDPOINT` - Analytics batch endpoint
    /// - `ANALYTICS_BATCH_SIZE` - Events per batch (default: 10)
    /// - `ANALYTICS_FLUSH_INTERVAL` - Flush frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            cache_default_ttl: env_or("CACHE_DEFAULT_TTL", DEFAULT_TTL_SECS),
            cleanup_interval: env_or("CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL_SECS),
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            api_token: env::var("API_TOKEN").ok().filter(|token| !token.is_empty()),
            api_timeout: env_or("API_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            api_max_retries: env_or("API_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            api_retry_delay_ms: env_or("API_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS),
            analytics_endpoint: env::var("ANALYTICS_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ANALYTICS_ENDPOINT.to_string()),
            analytics_batch_size: env_or("ANALYTICS_BATCH_SIZE", DEFAULT_BATCH_SIZE),
            analytics_flush_interval: env_or(
                "ANALYTICS_FLUSH_INTERVAL",
                DEFAULT_FLUSH_INTERVAL_SECS,
            ),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_default_ttl)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.api_timeout),
            max_retries: self.api_max_retries,
            retry_delay: Duration::from_millis(self.api_retry_delay_ms),
        }
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            batch_size: self.analytics_batch_size,
            flush_interval: Duration::from_secs(self.analytics_flush_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            cache_default_ttl: DEFAULT_TTL_SECS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            api_timeout: DEFAULT_TIMEOUT_SECS,
            api_max_retries: DEFAULT_MAX_RETRIES,
            api_retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            analytics_endpoint: DEFAULT_ANALYTICS_ENDPOINT.to_string(),
            analytics_batch_size: DEFAULT_BATCH_SIZE,
            analytics_flush_interval: DEFAULT_FLUSH_INTERVAL_SECS,
        }
    }
}

/// Parses an environment variable, falling back to `default` when it is
/// unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_default_ttl, 300);
        assert_eq!(config.api_timeout, 30);
        assert_eq!(config.api_max_retries, 3);
        assert_eq!(config.analytics_batch_size, 10);
        assert_eq!(config.analytics_flush_interval, 30);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "SERVER_PORT",
            "CACHE_DEFAULT_TTL",
            "API_TIMEOUT",
            "API_MAX_RETRIES",
            "ANALYTICS_BATCH_SIZE",
            "API_TOKEN",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_default_ttl, 300);
        assert_eq!(config.api_timeout, 30);
        assert_eq!(config.api_max_retries, 3);
        assert_eq!(config.analytics_batch_size, 10);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_derived_configs() {
        let config = Config {
            api_timeout: 5,
            api_retry_delay_ms: 250,
            analytics_batch_size: 25,
            ..Config::default()
        };

        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.retry_delay, Duration::from_millis(250));
        assert_eq!(config.queue_config().batch_size, 25);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_env_or_ignores_malformed_values() {
        env::set_var("RENTAL_EDGE_TEST_MALFORMED", "not-a-number");
        assert_eq!(env_or("RENTAL_EDGE_TEST_MALFORMED", 7u32), 7);
        env::remove_var("RENTAL_EDGE_TEST_MALFORMED");
    }
}
