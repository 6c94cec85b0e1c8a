pub mod file;
pub mod memory;
pub mod session;
pub mod warehouse_context;

use crate::error::app_error::ClientError;

pub const TOKEN_KEY: &str = "token";
pub const TOKEN_EXPIRY_KEY: &str = "token_expiry";
pub const MAIL_KEY: &str = "mail";
pub const CURRENT_WAREHOUSE_KEY: &str = "currentWarehouse";

/// Durable string key-value storage shared by the session and warehouse stores.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

pub trait Clock: Send + Sync {
    fn now_epoch_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
