//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Last.fm API credentials configuration.
    pub lastfm: LastfmConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the Last.fm API.
///
/// Both values are mandatory: the API key identifies the application and
/// the shared secret signs authenticated requests. Get them at
/// <https://www.last.fm/api/account/create>.
#[derive(Clone, Serialize, Deserialize)]
pub struct LastfmConfig {
    /// Last.fm API key.
    pub api_key: String,

    /// Last.fm shared secret, used to compute request signatures.
    pub shared_secret: String,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for LastfmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LastfmConfig")
            .field("api_key", &"[REDACTED]")
            .field("shared_secret", &"[REDACTED]")
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "lastfm-mcp-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `LASTFM_API_KEY` and `LASTFM_SHARED_SECRET` are required; everything
    /// else falls back to defaults. Optional overrides: `MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut server = ServerConfig::default();
        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            server.name = name;
        }

        let mut logging = LoggingConfig::default();
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        let lastfm = LastfmConfig {
            api_key: required_env("LASTFM_API_KEY")?,
            shared_secret: required_env("LASTFM_SHARED_SECRET")?,
        };

        Ok(Self {
            server,
            logging,
            lastfm,
        })
    }
}

/// Read a mandatory environment variable, rejecting empty values.
fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(Error::config(format!("{name} is set but empty"))),
        Err(_) => Err(Error::config(format!(
            "{name} is not set. Create API credentials at https://www.last.fm/api/account/create"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("LASTFM_API_KEY", "test_key_12345");
            std::env::set_var("LASTFM_SHARED_SECRET", "test_secret_67890");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.lastfm.api_key, "test_key_12345");
        assert_eq!(config.lastfm.shared_secret, "test_secret_67890");
        unsafe {
            std::env::remove_var("LASTFM_API_KEY");
            std::env::remove_var("LASTFM_SHARED_SECRET");
        }
    }

    #[test]
    fn test_config_missing_credentials() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("LASTFM_API_KEY");
            std::env::remove_var("LASTFM_SHARED_SECRET");
        }
        assert!(Config::from_env().is_err());
    }

    #[test]
    fn test_config_empty_credentials_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("LASTFM_API_KEY", "  ");
            std::env::set_var("LASTFM_SHARED_SECRET", "secret");
        }
        assert!(Config::from_env().is_err());
        unsafe {
            std::env::remove_var("LASTFM_API_KEY");
            std::env::remove_var("LASTFM_SHARED_SECRET");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let lastfm = LastfmConfig {
            api_key: "super_secret_key".to_string(),
            shared_secret: "super_secret_value".to_string(),
        };
        let debug_str = format!("{:?}", lastfm);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(!debug_str.contains("super_secret_value"));
    }
}
