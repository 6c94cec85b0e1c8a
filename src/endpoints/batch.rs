use crate::compatibility_adapter::{adapt_list, adapt_product, adapt_sensor, unwrap_list};
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::batch::CreateBatchRequest;
use crate::models::product::ProductsAndSensors;
use serde_json::{Value, json};
use validator::Validate;

#[async_trait::async_trait]
pub trait BatchEndpoints: Send + Sync {
    /// Products and sensors that can be combined into a batch for one warehouse.
    async fn products_and_sensors(&self, warehouse_id: &str) -> Result<ProductsAndSensors, ClientError>;
    async fn create_batch(&self, warehouse_id: &str, request: &CreateBatchRequest) -> Result<Value, ClientError>;
    async fn delete_batch(&self, batch_id: &str) -> Result<(), ClientError>;
}

#[async_trait::async_trait]
impl BatchEndpoints for ApiGateway {
    async fn products_and_sensors(&self, warehouse_id: &str) -> Result<ProductsAndSensors, ClientError> {
        let mail = self.current_mail()?;
        let body = json!({ "mail": mail, "warehouseId": warehouse_id });
        let value = self.call("/get-products-sensors", &body).await?;

        Ok(ProductsAndSensors {
            products: adapt_list(unwrap_list(value.get("products").cloned().unwrap_or_default(), "products"), adapt_product),
            sensors: adapt_list(unwrap_list(value.get("sensors").cloned().unwrap_or_default(), "sensors"), adapt_sensor),
        })
    }

    async fn create_batch(&self, warehouse_id: &str, request: &CreateBatchRequest) -> Result<Value, ClientError> {
        request.validate()?;
        let mail = self.current_mail()?;
        self.call("/create-batch", &request.to_body(&mail, warehouse_id)).await
    }

    async fn delete_batch(&self, batch_id: &str) -> Result<(), ClientError> {
        let mail = self.current_mail()?;
        let body = json!({ "mail": mail, "batchId": batch_id });
        self.call("/delete-batch", &body).await?;
        Ok(())
    }
}
