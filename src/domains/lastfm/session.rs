//! Credential and session state for the Last.fm client.
//!
//! Credentials are immutable for the process lifetime and validated once at
//! startup. The authenticated session is the only shared mutable state in
//! the client: it is set by the auth handshake, read by every
//! session-requiring call, and cleared on logout or when the provider
//! rejects the session key. Locks are held only for the assignment, never
//! across a network call.

use chrono::{DateTime, Utc};
use std::sync::{Mutex, RwLock};

use super::error::{LastfmError, LastfmResult};

/// Process-wide API credentials.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub shared_secret: String,
}

impl Credentials {
    /// Validate and construct credentials. Empty values are a fatal
    /// configuration error; the server must not start without them.
    pub fn new(api_key: impl Into<String>, shared_secret: impl Into<String>) -> LastfmResult<Self> {
        let api_key = api_key.into();
        let shared_secret = shared_secret.into();
        if api_key.trim().is_empty() {
            return Err(LastfmError::config("Last.fm API key is empty"));
        }
        if shared_secret.trim().is_empty() {
            return Err(LastfmError::config("Last.fm shared secret is empty"));
        }
        Ok(Self {
            api_key,
            shared_secret,
        })
    }
}

/// Redact secrets from debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("shared_secret", &"[REDACTED]")
            .finish()
    }
}

/// An authenticated user session obtained from the auth handshake.
#[derive(Clone)]
pub struct Session {
    pub key: String,
    pub username: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("key", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

/// A short-lived request token issued by `auth.getToken`, consumed by
/// `auth.getSession`.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            issued_at: Utc::now(),
        }
    }
}

/// Holds the optional session and the pending handshake token.
#[derive(Default)]
pub struct SessionStore {
    session: RwLock<Option<Session>>,
    pending_token: Mutex<Option<AuthToken>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, if one has been established.
    pub fn current(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Replace the stored session. Single atomic assignment.
    pub fn set(&self, session: Session) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    /// Drop the stored session (logout or provider-side expiry).
    pub fn clear(&self) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Remember a token issued by `auth.getToken` until it is exchanged.
    pub fn store_token(&self, token: AuthToken) {
        *self.pending_token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    /// Consume the pending token, if any. Tokens are single-use.
    pub fn take_token(&self) -> Option<AuthToken> {
        self.pending_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}
