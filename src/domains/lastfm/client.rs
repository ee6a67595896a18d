//! The Last.fm operation dispatcher.
//!
//! `LastfmClient::invoke` is the single entry point the tool layer calls:
//! it resolves the operation in the static table, validates and stringifies
//! arguments, enforces the session precondition before any network I/O,
//! builds and signs the request, executes it with retries, classifies the
//! response, and applies the auth-handshake side effects. Each invocation is
//! independent; the only state shared between calls is the session store.

use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::{LastfmError, LastfmResult};
use super::operations::{self, OperationDef};
use super::request::{SignedRequest, build_request};
use super::session::{AuthToken, Credentials, Session, SessionStore};
use super::transport::{
    ApiTransport, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, HttpApiTransport, RetryPolicy,
    execute_with_retry,
};

/// Arguments for one operation, as received from the tool layer.
pub type Args = Map<String, Value>;

/// Client for the Last.fm API: credentials, session state, transport, and
/// retry policy.
pub struct LastfmClient {
    credentials: Credentials,
    session: SessionStore,
    transport: Arc<dyn ApiTransport>,
    retry: RetryPolicy,
}

impl LastfmClient {
    /// Production client against the real Last.fm endpoint.
    pub fn new(credentials: Credentials) -> LastfmResult<Self> {
        let transport = HttpApiTransport::new(DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT)?;
        Ok(Self::with_transport(
            credentials,
            Arc::new(transport),
            RetryPolicy::default(),
        ))
    }

    /// Client with an injected transport and retry policy. This is the seam
    /// tests use to observe requests and script responses.
    pub fn with_transport(
        credentials: Credentials,
        transport: Arc<dyn ApiTransport>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            credentials,
            session: SessionStore::new(),
            transport,
            retry,
        }
    }

    /// The web-confirmation URL for a request token, shown to the user
    /// during the auth handshake.
    pub fn auth_url(&self, token: &str) -> String {
        format!(
            "https://www.last.fm/api/auth/?api_key={}&token={}",
            self.credentials.api_key, token
        )
    }

    /// Username of the current session, if authenticated.
    pub fn session_username(&self) -> Option<String> {
        self.session.current().map(|s| s.username)
    }

    /// Install a session directly (e.g. restored by the embedding
    /// application).
    pub fn set_session(&self, session: Session) {
        self.session.set(session);
    }

    /// Dispatch one operation.
    pub async fn invoke(&self, operation: &str, args: &Args) -> LastfmResult<Value> {
        info!(operation, "dispatching Last.fm operation");

        // Logout is purely local: clear the session, no network call.
        if operation == "logout" {
            let was_authenticated = self.session.current().is_some();
            self.session.clear();
            return Ok(json!({
                "status": "ok",
                "was_authenticated": was_authenticated,
            }));
        }

        let def = operations::find(operation)
            .ok_or_else(|| LastfmError::UnknownOperation(operation.to_string()))?;

        let mut params = build_params(def, args)?;
        self.resolve_handshake_token(def, &mut params)?;

        // Fail fast before any I/O when a session is required but absent.
        let session = if def.requires_session {
            Some(self.session.current().ok_or_else(|| {
                LastfmError::auth_required(format!(
                    "operation '{}' requires an authenticated session; run the auth handshake first",
                    def.name
                ))
            })?)
        } else {
            None
        };

        let request = build_request(def, params, &self.credentials, session.as_ref())?;
        let result = self.execute(def, &request).await;

        match result {
            Ok(payload) => {
                self.apply_handshake_effects(def, &payload)?;
                Ok(payload)
            }
            Err(LastfmError::SessionExpired(message)) => {
                // The provider rejected the session key: drop it so the next
                // authenticated call fails fast instead of repeating the
                // same rejected session.
                warn!("Last.fm rejected the session key; clearing stored session");
                self.session.clear();
                Err(LastfmError::SessionExpired(message))
            }
            Err(err) => Err(err),
        }
    }

    /// Dispatch with an overall deadline covering all retries. On expiry the
    /// remaining retries are cancelled and `Timeout` is returned.
    pub async fn invoke_with_deadline(
        &self,
        operation: &str,
        args: &Args,
        deadline: Duration,
    ) -> LastfmResult<Value> {
        tokio::time::timeout(deadline, self.invoke(operation, args))
            .await
            .unwrap_or(Err(LastfmError::Timeout))
    }

    async fn execute(&self, def: &OperationDef, request: &SignedRequest) -> LastfmResult<Value> {
        debug!(method = def.method, verb = ?def.verb, "executing Last.fm request");
        execute_with_retry(self.transport.as_ref(), &self.retry, def.verb, request).await
    }

    /// `get_auth_session` consumes either an explicit `token` argument or
    /// the pending token stored by `get_auth_token`.
    fn resolve_handshake_token(
        &self,
        def: &OperationDef,
        params: &mut BTreeMap<String, String>,
    ) -> LastfmResult<()> {
        if def.name != "get_auth_session" || params.contains_key("token") {
            return Ok(());
        }
        match self.session.take_token() {
            Some(AuthToken { token, .. }) => {
                params.insert("token".to_string(), token);
                Ok(())
            }
            None => Err(LastfmError::validation(
                "no auth token available: pass 'token' or call get_auth_token first",
            )),
        }
    }

    /// Success-path side effects of the handshake operations. This is the
    /// only place a session is established.
    fn apply_handshake_effects(&self, def: &OperationDef, payload: &Value) -> LastfmResult<()> {
        match def.name {
            "get_auth_token" => {
                let token = payload
                    .get("token")
                    .and_then(Value::as_str)
                    .ok_or_else(|| malformed_payload("token response missing 'token'"))?;
                self.session.store_token(AuthToken::new(token));
                Ok(())
            }
            "get_auth_session" | "get_mobile_session" => {
                let session = session_from_payload(payload)
                    .ok_or_else(|| malformed_payload("session response missing key or name"))?;
                info!(username = %session.username, "Last.fm session established");
                self.session.set(session);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn malformed_payload(message: &str) -> LastfmError {
    LastfmError::Provider {
        code: 0,
        message: message.to_string(),
    }
}

fn session_from_payload(payload: &Value) -> Option<Session> {
    let session = payload.get("session")?;
    Some(Session {
        key: session.get("key")?.as_str()?.to_string(),
        username: session.get("name")?.as_str()?.to_string(),
    })
}

/// Collect and stringify the operation's parameters from the caller's
/// arguments. Only parameters the table names are forwarded, so the signed
/// set is deterministic for a given invocation.
fn build_params(def: &OperationDef, args: &Args) -> LastfmResult<BTreeMap<String, String>> {
    let mut params = BTreeMap::new();

    for name in def.required {
        match stringify(name, args.get(*name))? {
            Some(value) => {
                params.insert(name.to_string(), value);
            }
            None => {
                return Err(LastfmError::validation(format!(
                    "operation '{}' requires parameter '{}'",
                    def.name, name
                )));
            }
        }
    }

    for name in def.any_of.iter().chain(def.optional) {
        if let Some(value) = stringify(name, args.get(*name))? {
            params.insert(name.to_string(), value);
        }
    }

    if !def.any_of.is_empty() && !def.any_of.iter().any(|name| params.contains_key(*name)) {
        return Err(LastfmError::validation(format!(
            "operation '{}' requires one of: {}",
            def.name,
            def.any_of.join(", ")
        )));
    }

    Ok(params)
}

/// Provider convention: everything is a string on the wire, booleans as
/// "1"/"0". Null and absent values are simply omitted.
fn stringify(name: &str, value: Option<&Value>) -> LastfmResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
        Some(_) => Err(LastfmError::validation(format!(
            "parameter '{name}' must be a string, number, or boolean"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::request::HttpVerb;
    use super::super::transport::TransportFailure;
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Scripted transport that records every request.
    #[derive(Default)]
    struct MockTransport {
        calls: AtomicU32,
        script: Mutex<VecDeque<Result<Value, TransportFailure>>>,
        requests: Mutex<Vec<(HttpVerb, BTreeMap<String, String>)>>,
    }

    impl MockTransport {
        fn scripted(
            responses: impl IntoIterator<Item = Result<Value, TransportFailure>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                script: Mutex::new(responses.into_iter().collect()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> (HttpVerb, BTreeMap<String, String>) {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ApiTransport for MockTransport {
        async fn execute(
            &self,
            verb: HttpVerb,
            params: &BTreeMap<String, String>,
        ) -> Result<Value, TransportFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push((verb, params.clone()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("mock transport called more times than scripted")
        }
    }

    fn client(transport: Arc<MockTransport>) -> LastfmClient {
        LastfmClient::with_transport(
            Credentials::new("abc123", "topsecret").unwrap(),
            transport,
            RetryPolicy::immediate(3),
        )
    }

    fn args(pairs: &[(&str, Value)]) -> Args {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn error_envelope(code: u32, message: &str) -> Value {
        json!({ "error": code, "message": message })
    }

    fn test_session() -> Session {
        Session {
            key: "SESSION".to_string(),
            username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let transport = MockTransport::scripted([]);
        let client = client(transport.clone());
        let result = client.invoke("get_artist_biography", &Args::new()).await;
        assert!(matches!(result, Err(LastfmError::UnknownOperation(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_required_param_makes_no_call() {
        let transport = MockTransport::scripted([]);
        let client = client(transport.clone());
        let result = client.invoke("search_artists", &Args::new()).await;
        assert!(matches!(result, Err(LastfmError::Validation(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_any_of_param_enforced() {
        let transport = MockTransport::scripted([]);
        let client = client(transport.clone());
        // neither artist nor mbid
        let result = client
            .invoke("get_artist_info", &args(&[("lang", json!("en"))]))
            .await;
        assert!(matches!(result, Err(LastfmError::Validation(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_session_required_makes_no_network_call() {
        let transport = MockTransport::scripted([]);
        let client = client(transport.clone());
        let result = client
            .invoke(
                "scrobble_track",
                &args(&[
                    ("artist", json!("Radiohead")),
                    ("track", json!("Airbag")),
                    ("timestamp", json!(1700000000)),
                ]),
            )
            .await;
        assert!(matches!(result, Err(LastfmError::AuthRequired(_))));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_artist_info_end_to_end() {
        let payload = json!({ "artist": { "name": "Radiohead", "listeners": "5000000" } });
        let transport = MockTransport::scripted([Ok(payload.clone())]);
        let client = client(transport.clone());

        let result = client
            .invoke("get_artist_info", &args(&[("artist", json!("Radiohead"))]))
            .await
            .unwrap();

        // payload passes through unchanged
        assert_eq!(result, payload);

        let (verb, params) = transport.last_request();
        assert_eq!(verb, HttpVerb::Get);
        assert_eq!(params.get("method").unwrap(), "artist.getinfo");
        assert_eq!(params.get("api_key").unwrap(), "abc123");
        assert_eq!(params.get("artist").unwrap(), "Radiohead");
        assert_eq!(params.get("format").unwrap(), "json");
        assert!(!params.contains_key("api_sig"), "public reads are unsigned");
        assert!(!params.contains_key("sk"));
    }

    #[tokio::test]
    async fn test_scrobble_end_to_end_after_session() {
        let transport = MockTransport::scripted([Ok(json!({ "scrobbles": {} }))]);
        let client = client(transport.clone());
        client.set_session(test_session());

        let scrobble_args = args(&[
            ("artist", json!("Radiohead")),
            ("track", json!("Airbag")),
            ("timestamp", json!(1700000000)),
            ("chosenByUser", json!(false)),
        ]);
        client.invoke("scrobble_track", &scrobble_args).await.unwrap();

        let (verb, params) = transport.last_request();
        assert_eq!(verb, HttpVerb::Post);
        assert_eq!(params.get("method").unwrap(), "track.scrobble");
        assert_eq!(params.get("api_key").unwrap(), "abc123");
        assert_eq!(params.get("sk").unwrap(), "SESSION");
        assert!(params.contains_key("api_sig"), "writes must be signed");
        // booleans travel as "0"/"1"
        assert_eq!(params.get("chosenByUser").unwrap(), "0");
    }

    #[tokio::test]
    async fn test_unknown_args_are_not_forwarded() {
        let transport = MockTransport::scripted([Ok(json!({}))]);
        let client = client(transport.clone());
        client
            .invoke(
                "search_artists",
                &args(&[("artist", json!("Low")), ("surprise", json!("ignored"))]),
            )
            .await
            .unwrap();
        let (_, params) = transport.last_request();
        assert!(!params.contains_key("surprise"));
    }

    #[tokio::test]
    async fn test_transient_failures_then_success() {
        let payload = json!({ "results": {} });
        let transport = MockTransport::scripted([
            Err(TransportFailure::Timeout),
            Err(TransportFailure::Connection("reset".into())),
            Ok(payload.clone()),
        ]);
        let client = client(transport.clone());

        let result = client
            .invoke("search_artists", &args(&[("artist", json!("Low"))]))
            .await
            .unwrap();
        assert_eq!(result, payload);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_rate_limit_envelope_is_retried() {
        let transport = MockTransport::scripted([
            Ok(error_envelope(29, "Rate limit exceeded")),
            Ok(json!({ "results": {} })),
        ]);
        let client = client(transport.clone());

        client
            .invoke("search_artists", &args(&[("artist", json!("Low"))]))
            .await
            .unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_validation_error_is_not_retried() {
        let transport = MockTransport::scripted([Ok(error_envelope(6, "Invalid parameters"))]);
        let client = client(transport.clone());

        let result = client
            .invoke("search_artists", &args(&[("artist", json!("Low"))]))
            .await;
        assert!(matches!(result, Err(LastfmError::Validation(_))));
        assert_eq!(transport.calls(), 1, "non-transient errors get one attempt");
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_as_non_retryable() {
        let transport = MockTransport::scripted([
            Err(TransportFailure::Timeout),
            Err(TransportFailure::Timeout),
            Err(TransportFailure::Timeout),
        ]);
        let client = client(transport.clone());

        let result = client
            .invoke("search_artists", &args(&[("artist", json!("Low"))]))
            .await;
        match result {
            Err(LastfmError::Transport { retryable, message }) => {
                assert!(!retryable, "exhausted budget must not look retryable");
                assert!(message.contains("3 attempts"));
            }
            other => panic!("expected Transport error, got {other:?}"),
        }
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_invalid_session_clears_stored_session() {
        let transport = MockTransport::scripted([Ok(error_envelope(9, "Invalid session key"))]);
        let client = client(transport.clone());
        client.set_session(test_session());

        let love_args = args(&[("artist", json!("Low")), ("track", json!("Especially Me"))]);
        let result = client.invoke("love_track", &love_args).await;
        assert!(matches!(result, Err(LastfmError::SessionExpired(_))));
        assert_eq!(transport.calls(), 1);

        // the next authenticated call fails fast, no network
        let result = client.invoke("love_track", &love_args).await;
        assert!(matches!(result, Err(LastfmError::AuthRequired(_))));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_auth_handshake_establishes_session() {
        let transport = MockTransport::scripted([
            Ok(json!({ "token": "tok456" })),
            Ok(json!({ "session": { "name": "alice", "key": "sess789", "subscriber": "0" } })),
            Ok(json!({ "status": "ok" })),
        ]);
        let client = client(transport.clone());

        // step 1: token issue is a signed GET
        client.invoke("get_auth_token", &Args::new()).await.unwrap();
        let (verb, params) = transport.last_request();
        assert_eq!(verb, HttpVerb::Get);
        assert!(params.contains_key("api_sig"));

        // step 2: session exchange consumes the stored token
        client
            .invoke("get_auth_session", &Args::new())
            .await
            .unwrap();
        let (verb, params) = transport.last_request();
        assert_eq!(verb, HttpVerb::Post);
        assert_eq!(params.get("token").unwrap(), "tok456");
        assert_eq!(client.session_username().as_deref(), Some("alice"));

        // the token is single-use: a second exchange without an explicit
        // token argument fails before any I/O
        let calls_before = transport.calls();
        let result = client.invoke("get_auth_session", &Args::new()).await;
        assert!(matches!(result, Err(LastfmError::Validation(_))));
        assert_eq!(transport.calls(), calls_before);

        // the established session flows into authenticated calls
        client
            .invoke(
                "love_track",
                &args(&[("artist", json!("Low")), ("track", json!("Especially Me"))]),
            )
            .await
            .unwrap();
        let (_, params) = transport.last_request();
        assert_eq!(params.get("sk").unwrap(), "sess789");
    }

    #[tokio::test]
    async fn test_explicit_token_argument_wins() {
        let transport = MockTransport::scripted([Ok(
            json!({ "session": { "name": "bob", "key": "sessX" } }),
        )]);
        let client = client(transport.clone());

        client
            .invoke("get_auth_session", &args(&[("token", json!("explicit"))]))
            .await
            .unwrap();
        let (_, params) = transport.last_request();
        assert_eq!(params.get("token").unwrap(), "explicit");
    }

    #[tokio::test]
    async fn test_logout_is_local_only() {
        let transport = MockTransport::scripted([]);
        let client = client(transport.clone());
        client.set_session(test_session());

        let result = client.invoke("logout", &Args::new()).await.unwrap();
        assert_eq!(result["was_authenticated"], json!(true));
        assert!(client.session_username().is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_session_payload_is_an_error() {
        let transport = MockTransport::scripted([Ok(json!({ "session": { "name": "alice" } }))]);
        let client = client(transport.clone());
        let result = client
            .invoke("get_auth_session", &args(&[("token", json!("tok"))]))
            .await;
        assert!(matches!(result, Err(LastfmError::Provider { .. })));
        assert!(client.session_username().is_none());
    }

    #[tokio::test]
    async fn test_deadline_cancels_retries() {
        /// Transport that hangs long enough to trip the deadline.
        struct SlowTransport;

        #[async_trait]
        impl ApiTransport for SlowTransport {
            async fn execute(
                &self,
                _verb: HttpVerb,
                _params: &BTreeMap<String, String>,
            ) -> Result<Value, TransportFailure> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(json!({}))
            }
        }

        let client = LastfmClient::with_transport(
            Credentials::new("abc123", "topsecret").unwrap(),
            Arc::new(SlowTransport),
            RetryPolicy::immediate(3),
        );

        let result = client
            .invoke_with_deadline(
                "search_artists",
                &args(&[("artist", json!("Low"))]),
                Duration::from_millis(20),
            )
            .await;
        assert!(matches!(result, Err(LastfmError::Timeout)));
    }

    #[tokio::test]
    async fn test_non_scalar_argument_rejected() {
        let transport = MockTransport::scripted([]);
        let client = client(transport.clone());
        let result = client
            .invoke("search_artists", &args(&[("artist", json!(["Low"]))]))
            .await;
        assert!(matches!(result, Err(LastfmError::Validation(_))));
        assert_eq!(transport.calls(), 0);
    }
}
