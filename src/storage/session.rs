use crate::error::app_error::ClientError;
use crate::models::session::Session;
use crate::storage::{Clock, KeyValueStore, MAIL_KEY, TOKEN_EXPIRY_KEY, TOKEN_KEY};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Owns the token, expiry and user entries of the key-value store.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now_epoch_ms(&self) -> i64 {
        self.clock.now_epoch_ms()
    }

    /// Stores a session expiring `ttl` from now.
    pub fn set_session(&self, token: &str, ttl: Duration, user_identifier: &str) -> Result<Session, ClientError> {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let session = Session {
            token: token.to_string(),
            expires_at_epoch_ms: self.now_epoch_ms().saturating_add(ttl_ms),
            user_identifier: user_identifier.to_string(),
        };

        if let Err(e) = self.write_entries(&session) {
            if let Err(clear_error) = self.clear_session() {
                warn!(error = %clear_error, "failed to clear partially written session");
            }
            return Err(e);
        }
        debug!(user = %session.user_identifier, expires_at = session.expires_at_epoch_ms, "session stored");

        Ok(session)
    }

    fn write_entries(&self, session: &Session) -> Result<(), ClientError> {
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store.set(TOKEN_EXPIRY_KEY, &session.expires_at_epoch_ms.to_string())?;
        self.store.set(MAIL_KEY, &session.user_identifier)
    }

    /// The stored session, or `None` when any of its entries is missing or the
    /// expiry is not a number. An empty token counts as missing.
    pub fn get_session(&self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let expires_at_epoch_ms = parse_expiry(&self.store.get(TOKEN_EXPIRY_KEY)?)?;
        let user_identifier = self.store.get(MAIL_KEY)?;

        Some(Session {
            token,
            expires_at_epoch_ms,
            user_identifier,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.valid_session().is_some()
    }

    pub fn valid_session(&self) -> Option<Session> {
        let now = self.now_epoch_ms();
        self.get_session().filter(|s| s.is_valid_at(now))
    }

    /// Removes all session entries. Every entry is attempted even if one fails.
    pub fn clear_session(&self) -> Result<(), ClientError> {
        let results = [TOKEN_KEY, TOKEN_EXPIRY_KEY, MAIL_KEY].map(|key| self.store.remove(key));
        debug!("session cleared");
        results.into_iter().collect()
    }
}

fn parse_expiry(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
    })
}
