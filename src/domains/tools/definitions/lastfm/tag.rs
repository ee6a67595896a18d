//! Last.fm tag tools: tag info and tag-scoped top charts.

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

/// Parameters for tag operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmTagParams {
    /// The operation to perform.
    #[schemars(
        description = "Operation: 'info', 'top_artists', 'top_albums', 'top_tracks', or 'weekly_chart_list'"
    )]
    pub operation: String,

    #[schemars(description = "Tag name, e.g. 'shoegaze'")]
    pub tag: String,

    #[schemars(description = "Language code for the wiki (ISO 639 alpha-2), 'info' only")]
    pub lang: Option<String>,

    #[schemars(description = "Results per page (1-1000)")]
    pub limit: Option<u32>,

    #[schemars(description = "Page number to retrieve")]
    pub page: Option<u32>,
}

/// Last.fm tag tool.
#[derive(Debug, Clone)]
pub struct LastfmTagTool;

impl LastfmTagTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_tag";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Explore Last.fm tags (genres and folksonomy labels): get tag info, the top artists/albums/tracks for a tag, or the list of available weekly charts for a tag.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmTagParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "info" => "get_tag_info",
            "top_artists" => "get_tag_top_artists",
            "top_albums" => "get_tag_top_albums",
            "top_tracks" => "get_tag_top_tracks",
            "weekly_chart_list" => "get_tag_weekly_chart_list",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'info', 'top_artists', 'top_albums', \
                     'top_tracks', or 'weekly_chart_list'"
                ));
            }
        };

        let mut args = Args::new();
        args.insert("tag".to_string(), params.tag.clone().into());
        insert(&mut args, "lang", params.lang.as_deref());
        insert(&mut args, "limit", params.limit.map(validate_limit));
        insert(&mut args, "page", params.page);

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Tag {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmTagParams>(),
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
                let params: LastfmTagParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
