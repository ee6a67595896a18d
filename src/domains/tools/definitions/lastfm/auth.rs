//! Last.fm authentication tool: token handshake, session management, status.
//!
//! The desktop flow is two steps: `get_token` returns a request token and
//! an authorization URL the user must visit in a browser, then `get_session`
//! exchanges the approved token for a long-lived session key. The session
//! key is held in memory only and never appears in tool output.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::domains::lastfm::{Args, LastfmClient};

use super::common::{error_result, insert, payload_result};

/// Parameters for authentication operations.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LastfmAuthParams {
    /// The operation to perform.
    #[schemars(
        description = "Operation: 'get_token', 'get_session', 'mobile_session', 'logout', or 'status'"
    )]
    pub operation: String,

    #[schemars(
        description = "Request token from 'get_token', 'get_session' only. Omit to reuse the most recently issued token"
    )]
    pub token: Option<String>,

    #[schemars(description = "Last.fm username, 'mobile_session' only")]
    pub username: Option<String>,

    #[schemars(description = "Last.fm password, 'mobile_session' only")]
    pub password: Option<String>,
}

/// Last.fm authentication tool.
#[derive(Debug, Clone)]
pub struct LastfmAuthTool;

impl LastfmAuthTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "lastfm_auth";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Authenticate with Last.fm. 'get_token' starts the browser handshake and returns an authorization URL; after the user approves it, 'get_session' establishes the session. 'mobile_session' authenticates directly with username and password. 'status' reports whether a session is active, and 'logout' discards it.";

    /// Execute the tool logic.
    pub async fn execute(client: &LastfmClient, params: &LastfmAuthParams) -> CallToolResult {
        match params.operation.as_str() {
            "get_token" => Self::get_token(client).await,
            "get_session" => {
                let mut args = Args::new();
                insert(&mut args, "token", params.token.as_deref());
                match client.invoke("get_auth_session", &args).await {
                    Ok(_) => Self::status_payload(client, "Session established"),
                    Err(e) => error_result(&format!("Session exchange failed: {e}")),
                }
            }
            "mobile_session" => {
                let (Some(username), Some(password)) =
                    (params.username.as_deref(), params.password.as_deref())
                else {
                    return error_result("'mobile_session' requires 'username' and 'password'");
                };
                let mut args = Args::new();
                args.insert("username".to_string(), username.into());
                args.insert("password".to_string(), password.into());
                match client.invoke("get_mobile_session", &args).await {
                    Ok(_) => Self::status_payload(client, "Session established"),
                    Err(e) => error_result(&format!("Mobile session failed: {e}")),
                }
            }
            "logout" => match client.invoke("logout", &Args::new()).await {
                Ok(payload) => payload_result(payload),
                Err(e) => error_result(&format!("Logout failed: {e}")),
            },
            "status" => Self::status_payload(client, "Authentication status"),
            other => error_result(&format!(
                "Unknown operation: {other}. Use 'get_token', 'get_session', \
                 'mobile_session', 'logout', or 'status'"
            )),
        }
    }

    /// Fetch a request token and attach the authorization URL the user must
    /// visit before the token can be exchanged for a session.
    async fn get_token(client: &LastfmClient) -> CallToolResult {
        match client.invoke("get_auth_token", &Args::new()).await {
            Ok(payload) => {
                let Some(token) = payload.get("token").and_then(Value::as_str) else {
                    return error_result("Token response was missing the 'token' field");
                };
                payload_result(json!({
                    "token": token,
                    "auth_url": client.auth_url(token),
                    "instructions": "Open auth_url in a browser, approve access, then call lastfm_auth with operation 'get_session'.",
                }))
            }
            Err(e) => error_result(&format!("Token request failed: {e}")),
        }
    }

    /// Session status without exposing the session key.
    fn status_payload(client: &LastfmClient, note: &str) -> CallToolResult {
        let username = client.session_username();
        payload_result(json!({
            "note": note,
            "authenticated": username.is_some(),
            "username": username,
        }))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LastfmAuthParams>(),
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
                let params: LastfmAuthParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }
}
