use crate::endpoints::sensor::SensorEndpoints;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::sensor::{CreateSensorRequest, Sensor};
use crate::page::{LoadOutcome, Page};
use crate::storage::warehouse_context::WarehouseContextStore;

/// Sensors registered in the selected warehouse.
#[derive(Debug, Default)]
pub struct SensorsPage {
    page: Page<Vec<Sensor>>,
}

impl SensorsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<Vec<Sensor>> {
        &self.page
    }

    pub async fn load(&mut self, gateway: &ApiGateway, context: &WarehouseContextStore) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = match context.current_warehouse_id() {
            Ok(warehouse_id) => gateway.list_sensors(&warehouse_id).await,
            Err(e) => Err(e),
        };
        self.page.finish(ticket, result)
    }

    pub async fn create(&mut self, gateway: &ApiGateway, context: &WarehouseContextStore, request: &CreateSensorRequest) -> Result<Option<Sensor>, ClientError> {
        let warehouse_id = self.page.track(context.current_warehouse_id())?;
        let created = self.page.track(gateway.create_sensor(&warehouse_id, request).await)?;
        if let Some(sensor) = &created {
            self.page.update(|sensors| sensors.push(sensor.clone()));
        }
        Ok(created)
    }
}
