//! Last.fm album tools: search, detailed info, top tags.

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

/// Parameters for album operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmAlbumParams {
    /// The operation to perform.
    #[schemars(description = "Operation: 'search', 'info', or 'top_tags'")]
    pub operation: String,

    #[schemars(description = "Album title (or use 'mbid')")]
    pub album: Option<String>,

    #[schemars(description = "Artist name, needed with 'album' for 'info' and 'top_tags'")]
    pub artist: Option<String>,

    #[schemars(description = "MusicBrainz ID of the release (alternative to album+artist)")]
    pub mbid: Option<String>,

    #[schemars(description = "Correct misspelled names")]
    pub autocorrect: Option<bool>,

    #[schemars(description = "Username for personalized playcounts, 'info' only")]
    pub username: Option<String>,

    #[schemars(description = "Language code for the wiki (ISO 639 alpha-2), 'info' only")]
    pub lang: Option<String>,

    #[schemars(description = "Results per page (1-1000)")]
    pub limit: Option<u32>,

    #[schemars(description = "Page number to retrieve")]
    pub page: Option<u32>,
}

/// Last.fm album tool.
#[derive(Debug, Clone)]
pub struct LastfmAlbumTool;

impl LastfmAlbumTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_album";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Query Last.fm album data: search albums by title, get detailed album info (tracklist, stats, wiki), or list an album's top tags. Albums can be identified by artist+title or MusicBrainz ID.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmAlbumParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "search" => "search_albums",
            "info" => "get_album_info",
            "top_tags" => "get_album_top_tags",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'search', 'info', or 'top_tags'"
                ));
            }
        };

        let mut args = Args::new();
        insert(&mut args, "album", params.album.as_deref());
        insert(&mut args, "artist", params.artist.as_deref());
        insert(&mut args, "mbid", params.mbid.as_deref());
        insert(&mut args, "autocorrect", params.autocorrect);
        insert(&mut args, "username", params.username.as_deref());
        insert(&mut args, "lang", params.lang.as_deref());
        insert(&mut args, "limit", params.limit.map(validate_limit));
        insert(&mut args, "page", params.page);

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Album {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmAlbumParams>(),
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
                let params: LastfmAlbumParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
