//! Error types for the gateway
//!
//! Maps request and upstream failures onto HTTP responses using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::client::ApiError;
use crate::models::ErrorResponse;

// == App Error Enum ==
/// Unified error type for gateway handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The remote API call failed
    #[error(transparent)]
    Upstream(#[from] ApiError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(ApiError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Upstream(ApiError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(ApiError::Network(_) | ApiError::Serialization { .. }) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Upstream(err) => err.message(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for gateway handlers.
pub type Result<T> = std::result::Result<T, AppError>;
