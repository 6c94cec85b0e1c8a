use crate::error::app_error::ClientError;
use crate::storage::session::SessionStore;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Home,
    Alerts,
    CreateWarehouse,
    AddBatch,
    CreateProduct,
    CreateSensor,
    Warehouse,
    Utility,
    Report,
}

impl View {
    pub const ALL: [View; 10] = [
        View::Login,
        View::Home,
        View::Alerts,
        View::CreateWarehouse,
        View::AddBatch,
        View::CreateProduct,
        View::CreateSensor,
        View::Warehouse,
        View::Utility,
        View::Report,
    ];

    pub fn path(self) -> &'static str {
        match self {
            View::Login => "/",
            View::Home => "/home",
            View::Alerts => "/alerts",
            View::CreateWarehouse => "/create-warehouse",
            View::AddBatch => "/add-batch",
            View::CreateProduct => "/create-product",
            View::CreateSensor => "/create-sensor",
            View::Warehouse => "/warehouse",
            View::Utility => "/utility",
            View::Report => "/report",
        }
    }

    /// Matches the path part only; query, fragment and trailing slashes are ignored.
    pub fn from_path(path: &str) -> Option<View> {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        View::ALL.into_iter().find(|v| v.path() == normalized)
    }

    pub fn is_protected(self) -> bool {
        !matches!(self, View::Login)
    }

    /// Views that act on the selected warehouse.
    pub fn needs_warehouse_context(self) -> bool {
        matches!(self, View::Warehouse | View::AddBatch | View::CreateSensor)
    }
}

/// Unknown paths fall back to the login view.
pub fn resolve_path(path: &str) -> View {
    View::from_path(path).unwrap_or(View::Login)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Authorized,
    Unauthorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(View),
    Redirect(View),
}

/// Gates protected views on a valid local session.
///
/// The check is synchronous, so a protected view never starts loading data for
/// an expired session.
pub struct RouteGuard {
    sessions: SessionStore,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(sessions: SessionStore) -> Self {
        let state = if sessions.is_valid() {
            GuardState::Authorized
        } else {
            GuardState::Unauthorized
        };
        Self { sessions, state }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn enter(&mut self, view: View) -> Navigation {
        if !view.is_protected() {
            return Navigation::Render(view);
        }

        if self.sessions.is_valid() {
            self.state = GuardState::Authorized;
            Navigation::Render(view)
        } else {
            debug!(path = view.path(), "no valid session, redirecting to login");
            self.deauthorize();
            Navigation::Redirect(View::Login)
        }
    }

    /// Redirects on session expiry. Any other error stays with the page.
    pub fn on_error(&mut self, error: &ClientError) -> Option<Navigation> {
        if error.requires_login() {
            self.deauthorize();
            Some(Navigation::Redirect(View::Login))
        } else {
            None
        }
    }

    fn deauthorize(&mut self) {
        if let Err(e) = self.sessions.clear_session() {
            warn!(error = %e, "failed to clear session");
        }
        self.state = GuardState::Unauthorized;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthRedirect {
    pub token: String,
    pub mail: String,
}

/// Reads `token` and `mail` from an OAuth callback URL's query string. `None`
/// without a non-empty token; a missing mail is empty.
pub fn parse_oauth_redirect(url: &str) -> Option<OAuthRedirect> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();

    let mut token = None;
    let mut mail = None;
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let slot = match key {
            "token" => &mut token,
            "mail" => &mut mail,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(decode_component(value)?);
        }
    }

    Some(OAuthRedirect {
        token: token.filter(|t: &String| !t.is_empty())?,
        mail: mail.unwrap_or_default(),
    })
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}
