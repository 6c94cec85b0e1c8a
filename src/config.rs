use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3939";
pub const CONFIG_FILE: &str = "Frostgate.toml";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Absolute URL of the sign-up endpoint. The backend serves it outside `base_url`.
    pub signup_url: Option<String>,
    /// Absolute URL that starts the OAuth flow in a browser.
    pub oauth_url: Option<String>,
    /// Transport timeout. Unset means the HTTP client's defaults apply.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub storage_path: PathBuf,
    pub remember_ttl_secs: u64,
    pub default_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            signup_url: None,
            oauth_url: None,
            request_timeout_secs: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        let storage_path = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(".frostgate")
            .join("state.json");

        Self {
            storage_path,
            remember_ttl_secs: 24 * 60 * 60,
            default_ttl_secs: 60 * 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl SessionConfig {
    pub fn ttl(&self, remember: bool) -> Duration {
        if remember {
            Duration::from_secs(self.remember_ttl_secs)
        } else {
            Duration::from_secs(self.default_ttl_secs)
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Built-in defaults
    /// 2. Frostgate.toml (base configuration file)
    /// 3. Environment variables (prefixed with FROSTGATE_)
    /// 4. BACKEND_URL environment variable
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment(Toml::file(CONFIG_FILE)).extract()
    }

    fn figment(file: impl figment::Provider) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(file)
            // e.g. FROSTGATE_API__BASE_URL -> api.base_url
            .merge(Env::prefixed("FROSTGATE_").split("__"))
            .merge(Env::raw().only(&["BACKEND_URL"]).map(|_| "api.base_url".into()))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
