use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Batch {
    pub id: Option<String>,
    pub quantity: f64,
    pub sensor_id: Option<String>,
    pub product_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateBatchRequest {
    #[validate(length(min = 1, message = "Product definition required."))]
    pub product_id: String,
    #[validate(length(min = 1, message = "Sensor assignment required."))]
    pub sensor_id: String,
    #[validate(range(min = 1, message = "Valid quantity required."))]
    pub quantity: i64,
}

impl CreateBatchRequest {
    pub fn to_body(&self, mail: &str, warehouse_id: &str) -> Value {
        serde_json::json!({
            "mail": mail,
            "warehouseId": warehouse_id,
            "productId": self.product_id,
            "sensorId": self.sensor_id,
            "quantity": self.quantity,
        })
    }
}
