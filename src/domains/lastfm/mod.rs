//! Last.fm client domain: the signed-request orchestration layer.
//!
//! This module turns a tool invocation into a correctly authenticated,
//! correctly encoded outbound Last.fm API call and classifies the provider's
//! responses into a stable local error taxonomy:
//!
//! - `signature` — the provider's MD5 request signature
//! - `session` — credentials, session, and handshake-token state
//! - `operations` — the static operation catalog
//! - `request` — canonical signed request assembly
//! - `transport` — network execution with timeout/retry/backoff
//! - `response` — provider error-envelope classification
//! - `client` — the dispatcher tying the pieces together

pub mod client;
pub mod error;
pub mod operations;
pub mod request;
pub mod response;
pub mod session;
pub mod signature;
pub mod transport;

pub use client::{Args, LastfmClient};
pub use error::{LastfmError, LastfmResult};
pub use session::{Credentials, Session};
