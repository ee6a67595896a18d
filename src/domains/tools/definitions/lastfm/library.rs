//! Last.fm library tools: love/unlove tracks and manage personal tags.
//!
//! All operations are authenticated writes; they require a session
//! established with the `lastfm_auth` tool first.

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

use super::common::{error_result, insert, payload_result};

/// Parameters for library operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmLibraryParams {
    /// The operation to perform.
    #[schemars(description = "Operation: 'love', 'unlove', 'add_tags', or 'remove_tag'")]
    pub operation: String,

    #[schemars(description = "Artist name")]
    pub artist: String,

    #[schemars(description = "Track title")]
    pub track: String,

    #[schemars(description = "Comma-separated list of up to 10 tags, 'add_tags' only")]
    pub tags: Option<String>,

    #[schemars(description = "Single tag to remove, 'remove_tag' only")]
    pub tag: Option<String>,
}

/// Last.fm library tool.
#[derive(Debug, Clone)]
pub struct LastfmLibraryTool;

impl LastfmLibraryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_library";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Manage the authenticated user's Last.fm library: love or unlove a track, add personal tags to a track, or remove a tag. Requires a session from the lastfm_auth tool.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmLibraryParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "love" => "love_track",
            "unlove" => "unlove_track",
            "add_tags" => {
                if params.tags.is_none() {
                    return error_result("'add_tags' requires 'tags' (comma-separated, max 10)");
                }
                "add_track_tags"
            }
            "remove_tag" => {
                if params.tag.is_none() {
                    return error_result("'remove_tag' requires 'tag'");
                }
                "remove_track_tag"
            }
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'love', 'unlove', 'add_tags', or 'remove_tag'"
                ));
            }
        };

        let mut args = Args::new();
        args.insert("artist".to_string(), params.artist.clone().into());
        args.insert("track".to_string(), params.track.clone().into());
        insert(&mut args, "tags", params.tags.as_deref());
        insert(&mut args, "tag", params.tag.as_deref());

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Library {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmLibraryParams>(),
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
                let params: LastfmLibraryParams =
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
        let json = r#"{"operation": "love", "artist": "Slowdive", "track": "Alison"}"#;
        let params: LastfmLibraryParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.operation, "love");
        assert!(params.tags.is_none());
    }

    #[test]
    fn test_params_with_tags() {
        let json = r#"{"operation": "add_tags", "artist": "Slowdive", "track": "Alison",
                       "tags": "shoegaze,dreampop"}"#;
        let params: LastfmLibraryParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.tags.as_deref(), Some("shoegaze,dreampop"));
    }
}
