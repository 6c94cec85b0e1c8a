use crate::endpoints::warehouse::WarehouseEndpoints;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::warehouse::{CreateWarehouseRequest, Warehouse, WarehouseOverview};
use crate::page::{LoadOutcome, Page};
use crate::storage::warehouse_context::WarehouseContextStore;
use tracing::info;

#[derive(Debug, Default)]
pub struct HomePage {
    page: Page<WarehouseOverview>,
}

impl HomePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<WarehouseOverview> {
        &self.page
    }

    pub async fn load(&mut self, gateway: &ApiGateway) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = gateway.list_warehouses().await;
        self.page.finish(ticket, result)
    }

    /// Makes a listed warehouse the current context for the other views.
    pub fn select(&self, context: &WarehouseContextStore, warehouse_id: &str) -> Result<Warehouse, ClientError> {
        let warehouse = self
            .page
            .data()
            .and_then(|overview| overview.find(warehouse_id))
            .cloned()
            .ok_or_else(|| ClientError::MissingContext(format!("Warehouse {} is not in the list.", warehouse_id)))?;

        context.set_current_warehouse(&warehouse)?;
        info!(warehouse_id = %warehouse_id, "warehouse selected");
        Ok(warehouse)
    }

    pub async fn create_warehouse(&mut self, gateway: &ApiGateway, request: &CreateWarehouseRequest) -> Result<Option<Warehouse>, ClientError> {
        let created = self.page.track(gateway.create_warehouse(request).await)?;
        if let Some(warehouse) = &created {
            self.page.update(|overview| overview.warehouses.push(warehouse.clone()));
        }
        Ok(created)
    }
}
