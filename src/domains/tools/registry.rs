//! Tool Registry - central registration and metadata for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - Tool metadata for listing

use rmcp::model::Tool;

use super::definitions::{
    LastfmAlbumTool, LastfmArtistTool, LastfmAuthTool, LastfmChartTool, LastfmLibraryTool,
    LastfmScrobbleTool, LastfmTagTool, LastfmTrackTool, LastfmUserTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct is the single source of truth for which tools exist;
/// the router builds its routes from the same definitions.
pub struct ToolRegistry;

impl ToolRegistry {
    /// Get all tool names.
    pub fn tool_names() -> Vec<&'static str> {
        vec![
            LastfmArtistTool::NAME,
            LastfmAlbumTool::NAME,
            LastfmTrackTool::NAME,
            LastfmUserTool::NAME,
            LastfmTagTool::NAME,
            LastfmChartTool::NAME,
            LastfmScrobbleTool::NAME,
            LastfmLibraryTool::NAME,
            LastfmAuthTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            LastfmArtistTool::to_tool(),
            LastfmAlbumTool::to_tool(),
            LastfmTrackTool::to_tool(),
            LastfmUserTool::to_tool(),
            LastfmTagTool::to_tool(),
            LastfmChartTool::to_tool(),
            LastfmScrobbleTool::to_tool(),
            LastfmLibraryTool::to_tool(),
            LastfmAuthTool::to_tool(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_tool_names() {
        let names = ToolRegistry::tool_names();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"lastfm_artist"));
        assert!(names.contains(&"lastfm_album"));
        assert!(names.contains(&"lastfm_track"));
        assert!(names.contains(&"lastfm_user"));
        assert!(names.contains(&"lastfm_tag"));
        assert!(names.contains(&"lastfm_chart"));
        assert!(names.contains(&"lastfm_scrobble"));
        assert!(names.contains(&"lastfm_library"));
        assert!(names.contains(&"lastfm_auth"));
    }

    #[test]
    fn test_registry_metadata_matches_names() {
        let names = ToolRegistry::tool_names();
        let tools = ToolRegistry::get_all_tools();
        assert_eq!(names.len(), tools.len());
        for tool in tools {
            assert!(names.contains(&tool.name.as_ref()));
        }
    }
}
