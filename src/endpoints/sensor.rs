use crate::compatibility_adapter::{adapt_list, adapt_sensor, unwrap_list, unwrap_object};
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::sensor::{CreateSensorRequest, Sensor};
use serde_json::json;
use validator::Validate;

#[async_trait::async_trait]
pub trait SensorEndpoints: Send + Sync {
    async fn list_sensors(&self, warehouse_id: &str) -> Result<Vec<Sensor>, ClientError>;
    async fn create_sensor(&self, warehouse_id: &str, request: &CreateSensorRequest) -> Result<Option<Sensor>, ClientError>;
}

#[async_trait::async_trait]
impl SensorEndpoints for ApiGateway {
    async fn list_sensors(&self, warehouse_id: &str) -> Result<Vec<Sensor>, ClientError> {
        let mail = self.current_mail()?;
        let body = json!({ "mail": mail, "warehouseId": warehouse_id });
        let value = self.call("/getallsensors", &body).await?;
        Ok(adapt_list(unwrap_list(value, "sensors"), adapt_sensor))
    }

    async fn create_sensor(&self, warehouse_id: &str, request: &CreateSensorRequest) -> Result<Option<Sensor>, ClientError> {
        request.validate()?;
        let mail = self.current_mail()?;
        let value = self.call("/creatsensor", &request.to_body(&mail, warehouse_id)).await?;
        Ok(unwrap_object(value, "sensor").and_then(|v| adapt_sensor(&v)))
    }
}
