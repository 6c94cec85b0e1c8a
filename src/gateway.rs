pub mod transport;

use crate::error::app_error::ClientError;
use crate::error::json::{error_message_from_body, parse_success_body};
use crate::storage::session::SessionStore;
use crate::{join_url, normalize_base_url};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use transport::{HttpResponse, Transport};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Id attached to every backend request for correlating logs.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// The only component that talks to the backend.
///
/// Protected calls attach the bearer token of a valid local session. A missing
/// or expired session, or a 401 from the backend, clears the session and
/// surfaces as [`ClientError::SessionExpired`].
#[derive(Clone)]
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    sessions: SessionStore,
    base_url: String,
}

impl ApiGateway {
    pub fn new(transport: Arc<dyn Transport>, sessions: SessionStore, base_url: &str) -> Self {
        Self {
            transport,
            sessions,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Identifier of the logged-in user, sent as `mail` in protected bodies.
    pub fn current_mail(&self) -> Result<String, ClientError> {
        match self.sessions.valid_session() {
            Some(session) => Ok(session.user_identifier),
            None => Err(self.expire_session("local", "no valid session")),
        }
    }

    pub async fn call(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let Some(session) = self.sessions.valid_session() else {
            return Err(self.expire_session(path, "no valid session"));
        };

        let headers = [("Authorization", format!("Bearer {}", session.token))];
        let response = self.send(path, &self.url(path), &headers, body).await?;

        if response.status == 401 {
            return Err(self.expire_session(path, "backend rejected token"));
        }

        interpret(path, response)
    }

    /// Unauthenticated call relative to the base URL, e.g. `/login`.
    pub async fn call_public(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let url = self.url(path);
        self.call_public_url(&url, body).await
    }

    /// Unauthenticated call to an absolute URL. A 401 here is a plain failure,
    /// there is no session to expire.
    pub async fn call_public_url(&self, url: &str, body: &Value) -> Result<Value, ClientError> {
        let response = self.send(url, url, &[], body).await?;
        interpret(url, response)
    }

    async fn send(&self, path: &str, url: &str, headers: &[(&str, String)], body: &Value) -> Result<HttpResponse, ClientError> {
        let request_id = RequestId::new();
        let mut headers = headers.to_vec();
        headers.push((REQUEST_ID_HEADER, request_id.0.clone()));

        match self.transport.post_json(url, &headers, body).await {
            Ok(response) => {
                info!(request_id = %request_id.0, path = %path, status = response.status, "backend response");
                Ok(response)
            }
            Err(e) => {
                warn!(request_id = %request_id.0, path = %path, error = %e, "backend request failed");
                Err(e)
            }
        }
    }

    fn expire_session(&self, path: &str, reason: &str) -> ClientError {
        warn!(path = %path, reason = %reason, "session expired, clearing");
        if let Err(e) = self.sessions.clear_session() {
            warn!(error = %e, "failed to clear session");
        }
        ClientError::SessionExpired
    }
}

fn interpret(path: &str, response: HttpResponse) -> Result<Value, ClientError> {
    if response.is_success() {
        return parse_success_body(path, &response.body);
    }

    let message = error_message_from_body(response.status, &response.body);
    warn!(path = %path, status = response.status, message = %message, "backend returned an error");
    Err(ClientError::request_failed(response.status, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockReply, TEST_BASE_URL, TEST_MAIL, TEST_TOKEN, logged_in_env, test_env};
    use serde_json::json;

    #[tokio::test]
    async fn attaches_bearer_token_and_request_id() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!({"warehouses": []})));
        let body = json!({"mail": TEST_MAIL});

        let value = env.gateway.call("/warehouses", &body).await.unwrap();
        assert_eq!(value, json!({"warehouses": []}));

        let requests = env.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, format!("{}/warehouses", TEST_BASE_URL));
        assert_eq!(requests[0].header("Authorization").as_deref(), Some(format!("Bearer {}", TEST_TOKEN).as_str()));
        assert!(requests[0].header(REQUEST_ID_HEADER).is_some());
        assert_eq!(requests[0].body, body);
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() {
        let env = logged_in_env(|_, _| MockReply::Json(401, json!({"error": "jwt expired"})));

        let err = env.gateway.call("/alerts", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired));
        assert!(err.requires_login());
        assert!(env.sessions.get_session().is_none());
    }

    #[tokio::test]
    async fn missing_session_never_reaches_network() {
        let env = test_env(|_, _| MockReply::Json(200, json!({})));

        let err = env.gateway.call("/warehouses", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired));
        assert!(env.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn expired_session_is_cleared_before_calling() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!({})));
        env.clock.advance(2 * 60 * 60 * 1000);

        let err = env.gateway.call("/warehouses", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::SessionExpired));
        assert!(env.sessions.get_session().is_none());
        assert!(env.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn error_bodies_become_request_failed() {
        let env = logged_in_env(|path, _| match path {
            "/create-warehouse" => MockReply::Json(409, json!({"error": "Warehouse exists"})),
            "/utility" => MockReply::Text(502, "Bad Gateway".into()),
            _ => MockReply::Text(500, String::new()),
        });

        let err = env.gateway.call("/create-warehouse", &json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed (409): Warehouse exists");

        let err = env.gateway.call("/utility", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed { status: 502, ref message } if message == "Bad Gateway"));

        let err = env.gateway.call("/alerts", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed { status: 500, ref message } if message == "Server error: 500"));
        assert!(env.sessions.is_valid());
    }

    #[tokio::test]
    async fn network_failure_is_distinct_and_keeps_session() {
        let env = logged_in_env(|_, _| MockReply::NetworkDown);

        let err = env.gateway.call("/warehouses", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::NetworkUnavailable(_)));
        assert!(env.sessions.is_valid());
    }

    #[tokio::test]
    async fn non_json_success_is_invalid_response() {
        let env = logged_in_env(|_, _| MockReply::Text(200, "<html></html>".into()));
        let err = env.gateway.call("/generate-report", &json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn public_calls_skip_auth_and_keep_401_local() {
        let env = logged_in_env(|_, _| MockReply::Json(401, json!({"error": "Invalid credentials"})));

        let err = env.gateway.call_public("/login", &json!({"mail": "x", "pass": "y"})).await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed { status: 401, .. }));
        assert!(env.sessions.is_valid());
        assert!(env.transport.requests()[0].header("Authorization").is_none());
    }

    #[test]
    fn base_url_is_normalized() {
        let env = test_env(|_, _| MockReply::NetworkDown);
        let gateway = ApiGateway::new(env.transport.clone(), env.sessions.clone(), " http://backend.test/// ");
        assert_eq!(gateway.base_url(), "http://backend.test");
        assert_eq!(gateway.url("login"), "http://backend.test/login");
        assert_eq!(gateway.url("/alerts/resolve-all"), "http://backend.test/alerts/resolve-all");
    }
}
