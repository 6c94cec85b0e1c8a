use crate::Config;
use crate::auth::parse_oauth_redirect;
use crate::compatibility_adapter::first_truthy_string;
use crate::endpoints::mail_body;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::session::Session;
use crate::models::user::{AuthRequest, Credentials};
use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

/// Login, sign-up, OAuth capture and logout. Token issuance stays on the backend;
/// this only stores what it hands back.
pub struct AuthService<'a> {
    gateway: &'a ApiGateway,
    config: &'a Config,
}

impl<'a> AuthService<'a> {
    pub fn new(gateway: &'a ApiGateway, config: &'a Config) -> Self {
        Self { gateway, config }
    }

    pub async fn login(&self, credentials: &Credentials, remember: bool) -> Result<Session, ClientError> {
        credentials.validate()?;
        let body = serde_json::json!(AuthRequest::from(credentials));
        let value = self.gateway.call_public("/login", &body).await?;
        self.start_session(&value, &credentials.email, remember, "No token received.")
    }

    pub async fn signup(&self, credentials: &Credentials, remember: bool) -> Result<Session, ClientError> {
        credentials.validate()?;
        let url = configured_url(self.config.api.signup_url.as_deref(), "Signup URL not found.")?;
        let body = serde_json::json!(AuthRequest::from(credentials));
        let value = self.gateway.call_public_url(url, &body).await?;
        self.start_session(&value, &credentials.email, remember, "No token received from sign-up.")
    }

    /// Where the user goes to start the OAuth flow.
    pub fn oauth_url(&self) -> Result<&str, ClientError> {
        configured_url(self.config.api.oauth_url.as_deref(), "OAuth URL not found.")
    }

    /// Stores the session carried by an OAuth callback URL. `None` when the URL
    /// has no token.
    pub fn capture_oauth_redirect(&self, callback_url: &str, remember: bool) -> Result<Option<Session>, ClientError> {
        let Some(redirect) = parse_oauth_redirect(callback_url) else {
            return Ok(None);
        };

        let session = self
            .gateway
            .sessions()
            .set_session(&redirect.token, self.config.session.ttl(remember), &redirect.mail)?;
        info!(user = %session.user_identifier, "session captured from OAuth redirect");
        Ok(Some(session))
    }

    /// Tells the backend when a session exists, then always clears locally.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Some(session) = self.gateway.sessions().valid_session() {
            if let Err(e) = self.gateway.call("/logout", &mail_body(&session.user_identifier)).await {
                warn!(error = %e, "logout endpoint failed, clearing local session anyway");
            }
        }

        self.gateway.sessions().clear_session()?;
        info!("logged out");
        Ok(())
    }

    fn start_session(&self, value: &Value, email: &str, remember: bool, missing_token: &str) -> Result<Session, ClientError> {
        let token = value
            .as_object()
            .and_then(|obj| first_truthy_string(obj, &["token"]))
            .ok_or_else(|| ClientError::AuthenticationFailed(missing_token.to_string()))?;

        let session = self
            .gateway
            .sessions()
            .set_session(&token, self.config.session.ttl(remember), email)?;
        info!(user = %email, remember, "logged in");
        Ok(session)
    }
}

fn configured_url<'c>(url: Option<&'c str>, missing: &str) -> Result<&'c str, ClientError> {
    url.map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ClientError::Configuration(missing.to_string()))
}
