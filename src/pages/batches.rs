use crate::endpoints::batch::BatchEndpoints;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::batch::CreateBatchRequest;
use crate::models::product::ProductsAndSensors;
use crate::page::{LoadOutcome, Page};
use crate::storage::warehouse_context::WarehouseContextStore;
use serde_json::Value;
use tracing::info;

/// Add-batch form: products to pick from and the sensors still free in the
/// selected warehouse.
#[derive(Debug, Default)]
pub struct AddBatchPage {
    page: Page<ProductsAndSensors>,
}

impl AddBatchPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<ProductsAndSensors> {
        &self.page
    }

    pub async fn load(&mut self, gateway: &ApiGateway, context: &WarehouseContextStore) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = match context.current_warehouse_id() {
            Ok(warehouse_id) => gateway.products_and_sensors(&warehouse_id).await,
            Err(e) => Err(e),
        };
        self.page.finish(ticket, result)
    }

    /// Creates the batch in the selected warehouse. The sensor it used is no
    /// longer offered.
    pub async fn submit(&mut self, gateway: &ApiGateway, context: &WarehouseContextStore, request: &CreateBatchRequest) -> Result<Value, ClientError> {
        let warehouse_id = self.page.track(context.current_warehouse_id())?;
        let created = self.page.track(gateway.create_batch(&warehouse_id, request).await)?;

        self.page.update(|options| options.sensors.retain(|s| s.id.as_deref() != Some(request.sensor_id.as_str())));
        info!(warehouse_id = %warehouse_id, product_id = %request.product_id, quantity = request.quantity, "batch created");
        Ok(created)
    }
}
