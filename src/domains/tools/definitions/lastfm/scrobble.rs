//! Last.fm scrobbling tools: submit plays and update "now playing".
//!
//! Both operations are authenticated writes; they require a session
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

/// Parameters for scrobbling operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmScrobbleParams {
    /// The operation to perform.
    #[schemars(description = "Operation: 'scrobble' or 'now_playing'")]
    pub operation: String,

    #[schemars(description = "Artist name")]
    pub artist: String,

    #[schemars(description = "Track title")]
    pub track: String,

    #[schemars(description = "Unix timestamp (UTC) when the track started playing; required for 'scrobble'")]
    pub timestamp: Option<i64>,

    #[schemars(description = "Album title")]
    pub album: Option<String>,

    #[schemars(description = "Album artist, if different from the track artist")]
    pub album_artist: Option<String>,

    #[schemars(description = "Track duration in seconds")]
    pub duration: Option<u32>,

    #[schemars(description = "Track number on the album")]
    pub track_number: Option<u32>,

    #[schemars(description = "MusicBrainz recording ID")]
    pub mbid: Option<String>,

    #[schemars(description = "Whether the user actively chose this track, 'scrobble' only")]
    pub chosen_by_user: Option<bool>,

    #[schemars(description = "Stream ID for streaming services, 'scrobble' only")]
    pub stream_id: Option<String>,

    #[schemars(description = "Sub-client version context")]
    pub context: Option<String>,
}

/// Last.fm scrobble tool.
#[derive(Debug, Clone)]
pub struct LastfmScrobbleTool;

impl LastfmScrobbleTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_scrobble";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Submit a played track to the authenticated user's Last.fm profile ('scrobble') or update their 'now playing' status. Requires a session from the lastfm_auth tool.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmScrobbleParams) -> CallToolResult {
        let operation = match params.operation.as_str() {
            "scrobble" => {
                if params.timestamp.is_none() {
                    return error_result("'scrobble' requires a 'timestamp' (unix time, UTC)");
                }
                "scrobble_track"
            }
            "now_playing" => "update_now_playing",
            other => {
                return error_result(&format!(
                    "Unknown operation: {other}. Use 'scrobble' or 'now_playing'"
                ));
            }
        };

        let mut args = Args::new();
        args.insert("artist".to_string(), params.artist.clone().into());
        args.insert("track".to_string(), params.track.clone().into());
        insert(&mut args, "timestamp", params.timestamp);
        insert(&mut args, "album", params.album.as_deref());
        insert(&mut args, "albumArtist", params.album_artist.as_deref());
        insert(&mut args, "duration", params.duration);
        insert(&mut args, "trackNumber", params.track_number);
        insert(&mut args, "mbid", params.mbid.as_deref());
        insert(&mut args, "chosenByUser", params.chosen_by_user);
        insert(&mut args, "streamId", params.stream_id.as_deref());
        insert(&mut args, "context", params.context.as_deref());

        match client.invoke(operation, &args).await {
            Ok(payload) => payload_result(payload),
            Err(e) => error_result(&format!("Scrobble {} failed: {e}", params.operation)),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmScrobbleParams>(),
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
                let params: LastfmScrobbleParams =
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
        let json = r#"{"operation": "scrobble", "artist": "Low", "track": "Sunflower",
                       "timestamp": 1700000000, "album": "Things We Lost in the Fire"}"#;
        let params: LastfmScrobbleParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.timestamp, Some(1700000000));
        assert_eq!(params.album.as_deref(), Some("Things We Lost in the Fire"));
    }

    #[test]
    fn test_params_require_artist_and_track() {
        let json = r#"{"operation": "now_playing", "artist": "Low"}"#;
        assert!(serde_json::from_str::<LastfmScrobbleParams>(json).is_err());
    }
}
