//! Client Module
//!
//! Outbound calls to the remote API with timeout, retry-on-timeout, uniform
//! response parsing and centralized failure side effects.

mod error;
mod request;
mod response;
mod session;

pub use error::ApiError;
pub use request::{
    ApiClient, ClientConfig, QueryParams, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS,
    DEFAULT_TIMEOUT_SECS, GENERIC_ERROR_MESSAGE, NOT_FOUND_MESSAGE, PERMISSION_DENIED_MESSAGE,
    SERVER_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
pub use response::ResponseBody;
pub use session::{
    CredentialStore, LogNavigator, LogNotifier, MemoryCredentialStore, Navigator, Notifier,
    Severity, SIGN_IN_PATH,
};
