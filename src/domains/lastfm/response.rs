//! Classification of raw provider responses.
//!
//! Last.fm reports application-level failures as an error envelope
//! (`{"error": <code>, "message": "..."}`) inside an otherwise successful
//! transport response, so envelope detection must run before any HTTP-status
//! reasoning — transport success is not logical success. Successful payloads
//! pass through unchanged; this layer does not interpret domain data.

use serde_json::Value;

use super::error::{LastfmError, LastfmResult};

/// Map a raw provider response to a payload or a typed error.
pub fn classify(raw: Value) -> LastfmResult<Value> {
    let Some(envelope) = error_envelope(&raw) else {
        return Ok(raw);
    };
    Err(map_error_code(envelope.0, envelope.1))
}

/// Extract `(code, message)` if the body is a provider error envelope.
/// The error code is usually a JSON number but shows up as a string in some
/// responses.
fn error_envelope(raw: &Value) -> Option<(u32, String)> {
    let error = raw.get("error")?;
    let code = match error {
        Value::Number(n) => n.as_u64()? as u32,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string();
    Some((code, message))
}

/// The documented Last.fm error-code contract.
fn map_error_code(code: u32, message: String) -> LastfmError {
    match code {
        // invalid service / method / resource
        2 | 3 | 7 => LastfmError::NotFound(message),
        // invalid format / invalid parameters
        5 | 6 => LastfmError::Validation(message),
        // authentication failed, invalid API key, invalid signature,
        // unauthorized or expired token, suspended key
        4 | 10 | 13 | 14 | 15 | 26 => LastfmError::Auth(message),
        // invalid session key: the dispatcher clears the stored session
        9 => LastfmError::SessionExpired(message),
        // operation failed / temporarily unavailable
        8 | 16 => LastfmError::ServiceUnavailable(message),
        // service offline
        11 => LastfmError::ServiceUnavailable(message),
        // rate limit exceeded
        29 => LastfmError::RateLimited(message),
        _ => LastfmError::Provider { code, message },
    }
}
