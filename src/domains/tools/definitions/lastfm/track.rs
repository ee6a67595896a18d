//! Last.fm track read tools: search, detailed info, similar tracks, top tags.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

use crate::domains::lastfm::{Args, LastfmClient};

use super::common::{error_result, insert, payload_result, validate_limit};

/// Parameters for track read operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmTrackParams {
    /// The operation to perform.
    #[schemars(description = "Operation: 'search', 'info', 'similar', or 'top_tags'")]
    pub operation: String,

    #[schemars(description = "Track title (or use 'mbid')")]
    pub track: Option<String>,

    #[schemars(description = "Artist name, narrows 'search' and identifies the track otherwise")]
    pub artist: Option<String>,

    #[schemars(description = "MusicBrainz ID of the recording (alternative to track+artist)")]
    pub mbid: Option<String>,

    #[schemars(description = "Correct misspelled names")]
    pub autocorrect: Option<bool>,

    #[schemars(description = "Username for personalized playcounts, 'info' only")]
    pub username: Option<String>,

    #[schemars(description = "Results per page (1-1000)")]
    pub limit: Option<u32>,

    #[schemars(description = "Page number to retrieve, 'search' only")]
    pub page: Option<u32>,
}

/// Last.fm track tool.
#[derive(Debug, Clone)]
pub struct LastfmTrackTool;

impl LastfmTrackTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_track";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Query Last.fm track data: search tracks by title, get detailed track info (duration, stats, album), find similar tracks, or list a track's top tags. Tracks can be identified by artist+title or MusicBrainz ID.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmTrackParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "search" => "search_tracks",
            "info" => "get_track_info",
            "similar" => "get_similar_tracks",
            "top_tags" => "get_track_top_tags",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'search', 'info', 'similar', or 'top_tags'"
                ));
            }
        };

        let mut args = Args::new();
        insert(&mut args, "track", params.track.as_deref());
        insert(&mut args, "artist", params.artist.as_deref());
        insert(&mut args, "mbid", params.mbid.as_deref());
        insert(&mut args, "autocorrect", params.autocorrect);
        insert(&mut args, "username", params.username.as_deref());
        insert(&mut args, "limit", params.limit.map(validate_limit));
        insert(&mut args, "page", params.page);

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Track {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmTrackParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the MCP router.
    pub fn create_route<S>(client: Arc<LastfmClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let client = client.clone();
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: LastfmTrackParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_deserialize() {
        let json = r#"{"operation": "similar", "artist": "Radiohead", "track": "Airbag", "limit": 5}"#;
        let params: LastfmTrackParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.operation, "similar");
        assert_eq!(params.limit, Some(5));
    }
}
