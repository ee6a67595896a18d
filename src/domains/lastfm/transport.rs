//! Network execution with timeout, retry, and backoff.
//!
//! The `ApiTransport` trait is the seam between the dispatcher and the
//! wire: production uses `HttpApiTransport` (async reqwest against the
//! single Last.fm endpoint), tests inject a counting mock. The retry loop is
//! an explicit attempt counter driven by the classified error's `retryable`
//! flag — transient failures get up to `max_attempts` tries with exponential
//! backoff and jitter, everything else is surfaced on the first attempt.

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{LastfmError, LastfmResult};
use super::request::{HttpVerb, SignedRequest};
use super::response;

/// All Last.fm API methods go through this one endpoint; the method is a
/// request parameter, not a path.
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Default per-attempt timeout, matching the original client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A failure below the provider-protocol level.
#[derive(Debug, Clone)]
pub enum TransportFailure {
    /// Per-attempt timeout exceeded.
    Timeout,
    /// Connection-level error (DNS, refused, reset).
    Connection(String),
    /// Non-success HTTP status with a body that was not a provider error
    /// envelope.
    Status(u16),
    /// The body could not be decoded as JSON despite a success status.
    Decode(String),
}

impl TransportFailure {
    /// Timeouts, connection errors, and rate-limit/server statuses are
    /// transient; everything else is not.
    pub fn retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Connection(_) => true,
            Self::Status(code) => *code == 429 || *code >= 500,
            Self::Decode(_) => false,
        }
    }

    fn into_error(self) -> LastfmError {
        let retryable = self.retryable();
        let message = match self {
            Self::Timeout => "request timed out".to_string(),
            Self::Connection(msg) => format!("connection error: {msg}"),
            Self::Status(code) => format!("HTTP status {code}"),
            Self::Decode(msg) => format!("invalid JSON in response: {msg}"),
        };
        LastfmError::Transport { message, retryable }
    }
}

/// One network attempt against the provider. Implementations must return
/// any JSON body they can parse — even on an error status — so the
/// classifier can detect provider error envelopes before HTTP status is
/// considered.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(
        &self,
        verb: HttpVerb,
        params: &BTreeMap<String, String>,
    ) -> Result<Value, TransportFailure>;
}

/// Production transport over async reqwest.
pub struct HttpApiTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> LastfmResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LastfmError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ApiTransport for HttpApiTransport {
    async fn execute(
        &self,
        verb: HttpVerb,
        params: &BTreeMap<String, String>,
    ) -> Result<Value, TransportFailure> {
        let request = match verb {
            HttpVerb::Get => self.http.get(&self.base_url).query(params),
            HttpVerb::Post => self.http.post(&self.base_url).form(params),
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportFailure::Timeout
            } else {
                TransportFailure::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportFailure::Timeout
            } else {
                TransportFailure::Connection(e.to_string())
            }
        })?;

        // Last.fm reports application errors in the body, sometimes with a
        // non-2xx status. A parseable body always goes to the classifier.
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(TransportFailure::Status(status.as_u16())),
            Err(e) => Err(TransportFailure::Decode(e.to_string())),
        }
    }
}

/// Retry budget and backoff shape for one dispatcher call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Upper bound of the random jitter added to each backoff sleep.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Policy with zero sleeps, for tests.
    #[cfg(test)]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Backoff before the next attempt: `base * 2^(attempt-1)` capped at
    /// `max_delay`, plus uniform jitter.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        let capped = exp.min(self.max_delay);
        let jitter_ms = self.jitter.as_millis() as u64;
        capped + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}

/// Execute one provider call with retries, classifying each response.
///
/// Classification runs inside the loop so provider-level transient errors
/// (rate limits, temporary unavailability) are retried exactly like network
/// failures. When a retryable transport failure survives the whole budget it
/// is surfaced with `retryable: false` so the caller can tell "gave up after
/// retrying" from "never worked".
pub async fn execute_with_retry(
    transport: &dyn ApiTransport,
    policy: &RetryPolicy,
    verb: HttpVerb,
    request: &SignedRequest,
) -> LastfmResult<Value> {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let result = match transport.execute(verb, &request.params).await {
            Ok(raw) => response::classify(raw),
            Err(failure) => Err(failure.into_error()),
        };

        match result {
            Ok(payload) => {
                debug!(attempt, "Last.fm call succeeded");
                return Ok(payload);
            }
            Err(err) if err.retryable() && attempt < policy.max_attempts => {
                let delay = policy.backoff_delay(attempt);
                warn!(attempt, error = %err, delay_ms = delay.as_millis() as u64,
                    "transient Last.fm failure, backing off");
                tokio::time::sleep(delay).await;
            }
            Err(LastfmError::Transport { message, retryable }) if retryable => {
                return Err(LastfmError::Transport {
                    message: format!("{message} (gave up after {attempt} attempts)"),
                    retryable: false,
                });
            }
            Err(err) => return Err(err),
        }
    }
}
