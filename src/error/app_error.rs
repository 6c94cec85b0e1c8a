use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend rejected the token, or no valid session exists locally.
    #[error("Session expired, please log in again")]
    SessionExpired,
    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),
    /// A page needs a selected warehouse and none is usable.
    #[error("{0}")]
    MissingContext(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Invalid response from {path}")]
    InvalidResponse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Configuration error: {message}")]
    ConfigurationFile {
        message: String,
        #[source]
        source: figment::Error,
    },
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidResponse { path: path.into(), source }
    }

    pub fn storage(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            message: message.into(),
            source,
        }
    }

    /// Errors the route guard turns into a redirect to the login view.
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// Errors shown as an inline banner that the user can retry past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::RequestFailed { .. }
                | ClientError::NetworkUnavailable(_)
                | ClientError::ValidationError(_)
                | ClientError::AuthenticationFailed(_)
                | ClientError::InvalidResponse { .. }
        )
    }

    /// Errors that replace the whole page, with a way back to the home view.
    pub fn is_fatal_for_page(&self) -> bool {
        matches!(self, ClientError::MissingContext(_))
    }
}

impl From<figment::Error> for ClientError {
    fn from(e: figment::Error) -> Self {
        ClientError::ConfigurationFile {
            message: "Failed to read configuration".to_string(),
            source: e,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ClientError::Configuration(e.to_string())
        } else {
            ClientError::NetworkUnavailable(e.to_string())
        }
    }
}
