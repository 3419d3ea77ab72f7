//! Resilient Request Client
//!
//! Every call gets the bearer token and a JSON content type, a per-attempt
//! time budget, bounded retries on timeout, content-type driven body parsing,
//! and one centralized notification per failed call. Errors are always
//! returned to the caller after the notification.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::{debug, warn};

use super::session::{CredentialStore, Navigator, Notifier, Severity, SIGN_IN_PATH};
use super::{ApiError, ResponseBody};

// == Public Constants ==
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please sign in again.";
pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Query parameters. Sorted, so the query string is deterministic.
pub type QueryParams = BTreeMap<String, String>;

// == Client Config ==
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Prepended to every relative path
    pub base_url: String,
    /// Budget for one attempt, covering the request and its body
    pub timeout: Duration,
    /// Extra attempts allowed after a timeout
    pub max_retries: u32,
    /// Pause between a timeout and the next attempt
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

/// One outbound request, replayable across attempts.
struct PendingRequest<'a> {
    method: Method,
    url: String,
    query: Option<&'a QueryParams>,
    body: Option<Vec<u8>>,
}

// == Api Client ==
/// Handle to the remote API. Cheap to clone; clones share the connection
/// pool and collaborators.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    // == Constructor ==
    pub fn new(
        http: Client,
        config: ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
            notifier,
            navigator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    // == Verbs ==
    pub async fn get(&self, path: &str, params: &QueryParams) -> Result<ResponseBody, ApiError> {
        let query = (!params.is_empty()).then_some(params);
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<ResponseBody, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = self.encode(Method::POST, path, body)?;
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn put<B>(&self, path: &str, body: &B) -> Result<ResponseBody, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = self.encode(Method::PUT, path, body)?;
        self.request(Method::PUT, path, None, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ResponseBody, ApiError> {
        self.request(Method::DELETE, path, None, None).await
    }

    // == Request ==
    /// Runs one logical request: attempt, and on timeout wait and try again
    /// until the retry budget is spent. Other failures end the loop at once.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<Vec<u8>>,
    ) -> Result<ResponseBody, ApiError> {
        let pending = PendingRequest {
            method,
            url: self.url(path),
            query,
            body,
        };

        let mut attempt: u32 = 0;
        let result = loop {
            attempt += 1;
            match self.attempt(&pending, attempt).await {
                Err(err) if err.is_retryable() && attempt <= self.config.max_retries => {
                    warn!(
                        method = %pending.method,
                        url = %pending.url,
                        attempt,
                        "Request timed out, retrying in {:?}",
                        self.config.retry_delay
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                other => break other,
            }
        };

        result.map_err(|err| {
            self.handle_error(&pending, &err);
            err
        })
    }

    /// A single attempt bounded by the configured timeout. The timer is
    /// dropped with the attempt whichever way it settles.
    async fn attempt(&self, pending: &PendingRequest<'_>, attempt: u32) -> Result<ResponseBody, ApiError> {
        let mut builder = self
            .http
            .request(pending.method.clone(), &pending.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.credentials.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(query) = pending.query {
            builder = builder.query(query);
        }
        if let Some(body) = &pending.body {
            builder = builder.body(body.clone());
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, content_type, text))
        };

        let (status, content_type, text) =
            match tokio::time::timeout(self.config.timeout, exchange).await {
                Ok(result) => result.map_err(ApiError::Network)?,
                Err(_) => return Err(ApiError::Timeout { attempts: attempt }),
            };

        debug!(method = %pending.method, url = %pending.url, status = status.as_u16(), "Response received");

        if status.is_success() {
            return ResponseBody::parse(content_type.as_deref(), text);
        }

        // An unparseable error body is still worth handing back as text
        let body = match ResponseBody::parse(content_type.as_deref(), text) {
            Ok(body) => body,
            Err(ApiError::Serialization { raw, .. }) => ResponseBody::Text(raw),
            Err(other) => return Err(other),
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    // == Error Handling ==
    /// Side effects for a failed call. Runs once per logical request.
    fn handle_error(&self, pending: &PendingRequest<'_>, err: &ApiError) {
        warn!(method = %pending.method, url = %pending.url, error = %err, "Request failed");
        self.notify_failure(err);
    }

    fn notify_failure(&self, err: &ApiError) {
        let message = match err.status() {
            Some(401) => {
                self.credentials.clear();
                self.navigator.redirect(SIGN_IN_PATH);
                SESSION_EXPIRED_MESSAGE.to_string()
            }
            Some(403) => PERMISSION_DENIED_MESSAGE.to_string(),
            Some(404) => NOT_FOUND_MESSAGE.to_string(),
            Some(500) => SERVER_ERROR_MESSAGE.to_string(),
            _ => {
                let message = err.message();
                if message.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    message
                }
            }
        };

        self.notifier.notify(Severity::Error, &message);
    }

    /// Serializes a request body. A failure ends the call before any attempt
    /// but still goes through the usual error side effects.
    fn encode<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Vec<u8>, ApiError> {
        serde_json::to_vec(body).map_err(|source| {
            let err = ApiError::Serialization {
                raw: String::new(),
                source,
            };
            let pending = PendingRequest {
                method,
                url: self.url(path),
                query: None,
                body: None,
            };
            self.handle_error(&pending, &err);
            err
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
