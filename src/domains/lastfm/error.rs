//! Error taxonomy for the Last.fm client.
//!
//! Every failure surfaced by the dispatcher is one of these variants, with a
//! `retryable()` flag driving the retry loop. Messages never contain the
//! shared secret or a session key.

use thiserror::Error;

/// Result type for Last.fm client operations.
pub type LastfmResult<T> = std::result::Result<T, LastfmError>;

/// Errors produced by the Last.fm request orchestration layer.
#[derive(Debug, Clone, Error)]
pub enum LastfmError {
    /// Missing or malformed credentials at startup. Fatal.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller passed an operation name that is not in the table.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A session-requiring operation was attempted with no session.
    /// Raised before any network call.
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// The provider (or a local precondition) rejected the parameters.
    #[error("Invalid parameters: {0}")]
    Validation(String),

    /// Bad API key, bad signature, or an unauthorized/expired token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The provider rejected the session key. The stored session is
    /// cleared so the next authenticated call fails fast.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Provider rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Provider-side temporary failure (operation failed, service offline).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Unknown method, service, or resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network-level failure (connection error, per-attempt timeout,
    /// unclassifiable HTTP status). The flag distinguishes "worth
    /// retrying" from "gave up after retrying".
    #[error("Transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// Overall deadline exceeded; outstanding retries were cancelled.
    #[error("Operation timed out")]
    Timeout,

    /// Provider error code with no local mapping. Never swallowed.
    #[error("Last.fm error {code}: {message}")]
    Provider { code: u32, message: String },
}

impl LastfmError {
    /// Whether the retry loop may re-attempt the request.
    pub fn retryable(&self) -> bool {
        match self {
            Self::RateLimited(_) | Self::ServiceUnavailable(_) => true,
            Self::Transport { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an auth-required error.
    pub fn auth_required(msg: impl Into<String>) -> Self {
        Self::AuthRequired(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
