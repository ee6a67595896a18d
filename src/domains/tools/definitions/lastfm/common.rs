//! Shared helpers for the Last.fm tools.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;
use tracing::warn;

use crate::domains::lastfm::Args;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Render a Last.fm payload as pretty JSON text content.
pub fn payload_result(payload: Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult::success(vec![Content::text(text)])
}

/// Insert an argument if it is present.
pub fn insert<T: Into<Value>>(args: &mut Args, key: &str, value: Option<T>) {
    if let Some(value) = value {
        args.insert(key.to_string(), value.into());
    }
}

/// Clamp a page-size limit to the provider's allowed range (1-1000).
pub fn validate_limit(limit: u32) -> u32 {
    limit.clamp(1, 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(0), 1);
        assert_eq!(validate_limit(30), 30);
        assert_eq!(validate_limit(5000), 1000);
    }

    #[test]
    fn test_insert_skips_absent_values() {
        let mut args = Args::new();
        insert(&mut args, "artist", Some("Low"));
        insert::<&str>(&mut args, "mbid", None);
        insert(&mut args, "limit", Some(10u32));
        assert_eq!(args.get("artist"), Some(&json!("Low")));
        assert_eq!(args.get("limit"), Some(&json!(10)));
        assert!(!args.contains_key("mbid"));
    }

    #[test]
    fn test_payload_result_is_success() {
        let result = payload_result(json!({ "ok": true }));
        assert!(!result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_error_result_is_error() {
        let result = error_result("boom");
        assert!(result.is_error.unwrap_or(false));
    }
}
