use crate::models::warehouse::validate_not_blank;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Sensor {
    pub id: Option<String>,
    pub ip_address: String,
    pub sensor_type: String,
    pub device_id: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sensor {
    /// A sensor can take a new batch when the backend reports it free, or
    /// reports no status at all.
    pub fn is_available(&self) -> bool {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(status) => status.eq_ignore_ascii_case("available") || status.eq_ignore_ascii_case("free"),
        }
    }

    pub fn label(&self) -> String {
        let name = match self.device_id.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(device) => device.to_string(),
            None => format!("Sensor {}", self.id.as_deref().unwrap_or("?")),
        };
        if self.sensor_type.trim().is_empty() {
            name
        } else {
            format!("{} [{}]", name, self.sensor_type)
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateSensorRequest {
    #[validate(custom(function = "validate_not_blank", message = "IP address required."))]
    pub ip_address: String,
    #[validate(custom(function = "validate_not_blank", message = "Sensor type required."))]
    pub sensor_type: String,
    pub device_id: Option<String>,
}

impl CreateSensorRequest {
    pub fn to_body(&self, mail: &str, warehouse_id: &str) -> Value {
        let device_id = self
            .device_id
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        serde_json::json!({
            "mail": mail,
            "warehouseId": warehouse_id,
            "ip_address": self.ip_address.trim(),
            "sensor_type": self.sensor_type.trim(),
            "device_id": device_id,
        })
    }
}
