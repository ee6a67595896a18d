//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool calls to the dynamically-built router.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines a parameters struct, an `execute()` method with the
//! core logic, and a `create_route()` constructor for the router.
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::lastfm::{Credentials, LastfmClient};
use crate::domains::tools::build_tool_router;

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// tool calls to the shared Last.fm client.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared Last.fm API client, including the in-memory session store.
    client: Arc<LastfmClient>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> super::error::Result<Self> {
        let config = Arc::new(config);

        let credentials = Credentials::new(
            config.lastfm.api_key.clone(),
            config.lastfm.shared_secret.clone(),
        )?;
        let client = Arc::new(LastfmClient::new(credentials)?);

        Ok(Self {
            tool_router: build_tool_router::<Self>(client.clone()),
            config,
            client,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the shared Last.fm client.
    pub fn client(&self) -> &Arc<LastfmClient> {
        &self.client
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Last.fm MCP server. Query artists, albums, tracks, users, tags, and charts; \
                 authenticate with the lastfm_auth tool to scrobble and manage your library."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server: Default::default(),
            logging: Default::default(),
            lastfm: crate::core::config::LastfmConfig {
                api_key: "key".to_string(),
                shared_secret: "secret".to_string(),
            },
        }
    }

    #[test]
    fn test_server_construction() {
        let server = McpServer::new(test_config()).unwrap();
        assert_eq!(server.name(), "lastfm-mcp-server");
        assert_eq!(server.tool_router.list_all().len(), 9);
    }

    #[test]
    fn test_server_capabilities_tools_only() {
        let server = McpServer::new(test_config()).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_server_starts_unauthenticated() {
        let server = McpServer::new(test_config()).unwrap();
        assert!(server.client().session_username().is_none());
    }
}
