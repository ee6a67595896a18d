//! Last.fm user tools: profile info, listening history, top charts, loved
//! tracks.

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

/// Parameters for user operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmUserParams {
    /// The operation to perform.
    #[schemars(
        description = "Operation: 'info', 'recent_tracks', 'top_artists', 'top_albums', 'top_tracks', or 'loved_tracks'"
    )]
    pub operation: String,

    #[schemars(description = "Last.fm username")]
    pub user: String,

    #[schemars(
        description = "Time period for top charts: 'overall', '7day', '1month', '3month', '6month', or '12month'"
    )]
    pub period: Option<String>,

    #[schemars(description = "Results per page (1-1000)")]
    pub limit: Option<u32>,

    #[schemars(description = "Page number to retrieve")]
    pub page: Option<u32>,

    #[schemars(description = "Unix timestamp: only fetch recent tracks after this time")]
    pub from: Option<i64>,

    #[schemars(description = "Unix timestamp: only fetch recent tracks before this time")]
    pub to: Option<i64>,

    #[schemars(description = "Include extended data in recent tracks")]
    pub extended: Option<bool>,
}

/// Last.fm user tool.
#[derive(Debug, Clone)]
pub struct LastfmUserTool;

impl LastfmUserTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_user";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Query a Last.fm user's public data: profile info, recently played tracks, top artists/albums/tracks over a time period, and loved tracks.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmUserParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "info" => "get_user_info",
            "recent_tracks" => "get_user_recent_tracks",
            "top_artists" => "get_user_top_artists",
            "top_albums" => "get_user_top_albums",
            "top_tracks" => "get_user_top_tracks",
            "loved_tracks" => "get_user_loved_tracks",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'info', 'recent_tracks', 'top_artists', \
                     'top_albums', 'top_tracks', or 'loved_tracks'"
                ));
            }
        };

        let mut args = Args::new();
        args.insert("user".to_string(), params.user.clone().into());
        insert(&mut args, "period", params.period.as_deref());
        insert(&mut args, "limit", params.limit.map(validate_limit));
        insert(&mut args, "page", params.page);
        insert(&mut args, "from", params.from);
        insert(&mut args, "to", params.to);
        insert(&mut args, "extended", params.extended);

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("User {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmUserParams>(),
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
                let params: LastfmUserParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
