//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Each tool knows how to create its own route; the router just wires
//! them all to a shared Last.fm client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::domains::lastfm::LastfmClient;

use super::definitions::{
    LastfmAlbumTool, LastfmArtistTool, LastfmAuthTool, LastfmChartTool, LastfmLibraryTool,
    LastfmScrobbleTool, LastfmTagTool, LastfmTrackTool, LastfmUserTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<LastfmClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(LastfmArtistTool::create_route(client.clone()))
        .with_route(LastfmAlbumTool::create_route(client.clone()))
        .with_route(LastfmTrackTool::create_route(client.clone()))
        .with_route(LastfmUserTool::create_route(client.clone()))
        .with_route(LastfmTagTool::create_route(client.clone()))
        .with_route(LastfmChartTool::create_route(client.clone()))
        .with_route(LastfmScrobbleTool::create_route(client.clone()))
        .with_route(LastfmLibraryTool::create_route(client.clone()))
        .with_route(LastfmAuthTool::create_route(client))
}
