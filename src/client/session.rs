//! Session collaborators of the request client: where the bearer token lives,
//! where user-facing notices go, and how a forced sign-in is performed.

use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::{info, warn};

/// Entry point users are sent to when their session expires
pub const SIGN_IN_PATH: &str = "/auth";

// == Credential Store ==
/// Holds the single bearer token attached to outbound requests.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: String);
    fn clear(&self);
}

/// Process-local token storage.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// == Notifier ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Output-only sink for transient user-facing messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => warn!(notification = message, "User notification"),
            Severity::Info | Severity::Success => {
                info!(notification = message, ?severity, "User notification")
            }
        }
    }
}

// == Navigator ==
/// Performs navigation side effects such as the forced sign-in redirect.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Records redirects in the log; used where there is no browser to steer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect(&self, path: &str) {
        info!(target_path = path, "Redirecting to sign-in");
    }
}
