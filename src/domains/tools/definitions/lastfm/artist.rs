//! Last.fm artist tools: search, detailed info, top albums, top tracks.

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

/// Parameters for artist operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmArtistParams {
    /// The operation to perform.
    #[schemars(description = "Operation: 'search', 'info', 'top_albums', or 'top_tracks'")]
    pub operation: String,

    #[schemars(description = "Artist name (or use 'mbid')")]
    pub artist: Option<String>,

    #[schemars(description = "MusicBrainz ID of the artist (alternative to the name)")]
    pub mbid: Option<String>,

    #[schemars(description = "Language code for the biography (ISO 639 alpha-2), 'info' only")]
    pub lang: Option<String>,

    #[schemars(description = "Correct misspelled artist names (default: provider default)")]
    pub autocorrect: Option<bool>,

    #[schemars(description = "Username for personalized playcounts, 'info' only")]
    pub username: Option<String>,

    #[schemars(description = "Results per page (1-1000)")]
    pub limit: Option<u32>,

    #[schemars(description = "Page number to retrieve")]
    pub page: Option<u32>,
}

/// Last.fm artist tool.
#[derive(Debug, Clone)]
pub struct LastfmArtistTool;

impl LastfmArtistTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_artist";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Query Last.fm artist data: search artists by name, get detailed artist info (bio, stats, similar artists), or list an artist's top albums and top tracks. Artists can be identified by name or MusicBrainz ID.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmArtistParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "search" => "search_artists",
            "info" => "get_artist_info",
            "top_albums" => "get_artist_top_albums",
            "top_tracks" => "get_artist_top_tracks",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'search', 'info', 'top_albums', or 'top_tracks'"
                ));
            }
        };

        let mut args = Args::new();
        insert(&mut args, "artist", params.artist.as_deref());
        insert(&mut args, "mbid", params.mbid.as_deref());
        insert(&mut args, "lang", params.lang.as_deref());
        insert(&mut args, "autocorrect", params.autocorrect);
        insert(&mut args, "username", params.username.as_deref());
        insert(&mut args, "limit", params.limit.map(validate_limit));
        insert(&mut args, "page", params.page);

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Artist {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmArtistParams>(),
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
                let params: LastfmArtistParams =
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
    fn test_params_deserialize_with_defaults() {
        let json = r#"{"operation": "search", "artist": "Nirvana"}"#;
        let params: LastfmArtistParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.operation, "search");
        assert_eq!(params.artist.as_deref(), Some("Nirvana"));
        assert!(params.limit.is_none());
    }

    #[test]
    fn test_params_reject_missing_operation() {
        let json = r#"{"artist": "Nirvana"}"#;
        assert!(serde_json::from_str::<LastfmArtistParams>(json).is_err());
    }
}
