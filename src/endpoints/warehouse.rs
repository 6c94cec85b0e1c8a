use crate::compatibility_adapter::{adapt_batch, adapt_list, adapt_warehouse, coerce_number, unwrap_list, unwrap_object};
use crate::endpoints::mail_body;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::warehouse::{CreateWarehouseRequest, Warehouse, WarehouseDetail, WarehouseOverview};
use serde_json::{Value, json};
use validator::Validate;

#[async_trait::async_trait]
pub trait WarehouseEndpoints: Send + Sync {
    async fn list_warehouses(&self) -> Result<WarehouseOverview, ClientError>;
    async fn warehouse_detail(&self, warehouse_id: &str) -> Result<WarehouseDetail, ClientError>;
    async fn create_warehouse(&self, request: &CreateWarehouseRequest) -> Result<Option<Warehouse>, ClientError>;
}

#[async_trait::async_trait]
impl WarehouseEndpoints for ApiGateway {
    async fn list_warehouses(&self) -> Result<WarehouseOverview, ClientError> {
        let mail = self.current_mail()?;
        let value = self.call("/warehouses", &mail_body(&mail)).await?;
        Ok(overview_from(value))
    }

    async fn warehouse_detail(&self, warehouse_id: &str) -> Result<WarehouseDetail, ClientError> {
        let mail = self.current_mail()?;
        let body = json!({ "warehouse_id": warehouse_id, "mail": mail });
        let value = self.call("/getinfo_warehouse", &body).await?;
        Ok(detail_from(value))
    }

    async fn create_warehouse(&self, request: &CreateWarehouseRequest) -> Result<Option<Warehouse>, ClientError> {
        request.validate()?;
        let mail = self.current_mail()?;
        let value = self.call("/create-warehouse", &request.to_body(&mail)).await?;
        Ok(unwrap_object(value, "warehouse").and_then(|v| adapt_warehouse(&v)))
    }
}

/// `{warehouses, alertsCount?, alerts?}`. The count falls back to the length of
/// `alerts` when `alertsCount` is missing or zero.
fn overview_from(value: Value) -> WarehouseOverview {
    let alerts_count = coerce_number(value.get("alertsCount"));
    let alerts_count = if alerts_count > 0.0 {
        alerts_count as u64
    } else {
        value.get("alerts").and_then(Value::as_array).map_or(0, |a| a.len() as u64)
    };

    WarehouseOverview {
        warehouses: adapt_list(unwrap_list(value, "warehouses"), adapt_warehouse),
        alerts_count,
    }
}

/// `{warehouse?, batches}`
fn detail_from(mut value: Value) -> WarehouseDetail {
    let warehouse = value.get("warehouse").and_then(adapt_warehouse);
    let batches = match value.get_mut("batches").map(Value::take) {
        Some(batches) => adapt_list(unwrap_list(batches, "batches"), adapt_batch),
        None => Vec::new(),
    };

    WarehouseDetail { warehouse, batches }
}
