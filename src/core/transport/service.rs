//! Transport service - runs the server on its transport.
//!
//! This service provides a single entry point for starting the MCP server,
//! keeping main.rs independent of the transport details.

use tracing::info;

use super::TransportResult;
use super::stdio::StdioTransport;
use crate::core::McpServer;

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService;

impl TransportService {
    /// Start the transport with the given MCP server.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Starting transport: STDIO (standard MCP mode)");
        StdioTransport::run(server).await
    }
}
