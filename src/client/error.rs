//! Error types for the request client.

use thiserror::Error;

use super::ResponseBody;

// == Api Error ==
/// Failure of a logical request, after any retries.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Every attempt exceeded its time budget
    #[error("Request timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    /// Transport-level failure (connection refused, reset, DNS...)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("Request failed with status {status}")]
    Status { status: u16, body: ResponseBody },

    /// A body could not be encoded or decoded as JSON
    #[error("Invalid JSON payload: {source}")]
    Serialization {
        /// The raw text that failed to parse
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Only timeouts are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }

    /// Human-readable message: the server's `message`/`error` field when it
    /// sent one, otherwise this error's own description.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { body, .. } => body.message().unwrap_or_else(|| self.to_string()),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_timeouts_retry() {
        assert!(ApiError::Timeout { attempts: 1 }.is_retryable());

        let status = ApiError::Status {
            status: 404,
            body: ResponseBody::Text(String::new()),
        };
        assert!(!status.is_retryable());
        assert_eq!(status.status(), Some(404));
    }

    #[test]
    fn test_message_prefers_body() {
        let err = ApiError::Status {
            status: 422,
            body: ResponseBody::Json(json!({"message": "Dates overlap an existing rental"})),
        };
        assert_eq!(err.message(), "Dates overlap an existing rental");

        let err = ApiError::Status {
            status: 502,
            body: ResponseBody::Text("bad gateway".into()),
        };
        assert_eq!(err.message(), "Request failed with status 502");
    }

    #[test]
    fn test_serialization_keeps_raw_text() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ApiError::Serialization {
            raw: "{oops".into(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid JSON payload"));
        assert!(matches!(err, ApiError::Serialization { ref raw, .. } if raw == "{oops"));
    }
}
