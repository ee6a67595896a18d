//! Last.fm global chart tools.

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

/// Parameters for chart operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmChartParams {
    /// The operation to perform.
    #[schemars(description = "Operation: 'top_artists', 'top_tracks', or 'top_tags'")]
    pub operation: String,

    #[schemars(description = "Results per page (1-1000)")]
    pub limit: Option<u32>,

    #[schemars(description = "Page number to retrieve")]
    pub page: Option<u32>,
}

/// Last.fm chart tool.
#[derive(Debug, Clone)]
pub struct LastfmChartTool;

impl LastfmChartTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_chart";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get the global Last.fm charts: the most popular artists, tracks, or tags right now.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmChartParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "top_artists" => "get_chart_top_artists",
            "top_tracks" => "get_chart_top_tracks",
            "top_tags" => "get_chart_top_tags",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'top_artists', 'top_tracks', or 'top_tags'"
                ));
            }
        };

        let mut args = Args::new();
        insert(&mut args, "limit", params.limit.map(validate_limit));
        insert(&mut args, "page", params.page);

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Chart {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmChartParams>(),
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
                let params: LastfmChartParams =
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
        let json = r#"{"operation": "top_artists"}"#;
        let params: LastfmChartParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.operation, "top_artists");
        assert!(params.limit.is_none());
    }
}
