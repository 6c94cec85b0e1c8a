use crate::compatibility_adapter::adapt_warehouse;
use crate::error::app_error::ClientError;
use crate::models::warehouse::Warehouse;
use crate::storage::{CURRENT_WAREHOUSE_KEY, KeyValueStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// The single "current warehouse" slot. Last write wins.
#[derive(Clone)]
pub struct WarehouseContextStore {
    store: Arc<dyn KeyValueStore>,
}

impl WarehouseContextStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stores the full warehouse object, not only its id.
    pub fn set_current_warehouse(&self, warehouse: &Warehouse) -> Result<(), ClientError> {
        let serialized = serde_json::to_string(warehouse)
            .map_err(|e| ClientError::storage("Failed to serialize warehouse", std::io::Error::other(e)))?;
        self.store.set(CURRENT_WAREHOUSE_KEY, &serialized)
    }

    /// `None` when nothing is stored or the stored value cannot be read back.
    pub fn get_current_warehouse(&self) -> Option<Warehouse> {
        let raw = self.store.get(CURRENT_WAREHOUSE_KEY)?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => adapt_warehouse(&value),
            Err(e) => {
                debug!(error = %e, "stored warehouse context is malformed");
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(CURRENT_WAREHOUSE_KEY)
    }

    pub fn require_current_warehouse(&self) -> Result<Warehouse, ClientError> {
        self.get_current_warehouse()
            .ok_or_else(|| ClientError::MissingContext("No warehouse selected.".to_string()))
    }

    /// Id of the selected warehouse, for pages that act on it implicitly.
    pub fn current_warehouse_id(&self) -> Result<String, ClientError> {
        self.require_current_warehouse()?
            .id
            .ok_or_else(|| ClientError::MissingContext("Invalid warehouse ID reference.".to_string()))
    }
}
