pub mod auth;
pub mod compatibility_adapter;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod models;
pub mod page;
pub mod pages;
pub mod service;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::auth::RouteGuard;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::gateway::transport::ReqwestTransport;
use crate::storage::SystemClock;
use crate::storage::file::FileStore;
use crate::storage::session::SessionStore;
use crate::storage::warehouse_context::WarehouseContextStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG overrides the configured level, e.g.
    //   RUST_LOG=frostgate::gateway=debug
    //   RUST_LOG=info,frostgate::service=trace
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if json_format {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Trims whitespace and trailing slashes. Empty input means the default backend.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return config::DEFAULT_BACKEND_URL.to_string();
    }
    trimmed.to_string()
}

/// Joins with exactly one `/` between base and path.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');
    format!("{}/{}", base, suffix)
}

/// Everything a front end needs, wired to the persistent store.
pub struct Console {
    pub config: Config,
    pub gateway: ApiGateway,
    pub context: WarehouseContextStore,
    pub guard: RouteGuard,
}

pub fn build_console(config: Config) -> Result<Console, ClientError> {
    let store = Arc::new(FileStore::open(&config.session.storage_path)?);
    let sessions = SessionStore::new(store.clone(), Arc::new(SystemClock));
    let context = WarehouseContextStore::new(store);
    let transport = Arc::new(ReqwestTransport::new(config.api.request_timeout())?);
    let gateway = ApiGateway::new(transport, sessions.clone(), &config.api.base_url);
    let guard = RouteGuard::new(sessions);

    info!(
        base_url = %gateway.base_url(),
        storage = %config.session.storage_path.display(),
        "console ready"
    );

    Ok(Console {
        config,
        gateway,
        context,
        guard,
    })
}
