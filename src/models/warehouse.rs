use crate::models::batch::Batch;
use crate::service::service_util::percent_of;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

/// Canonical warehouse shape. Built by the compatibility adapter from whatever
/// key names the endpoint used; unrecognized server fields stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Warehouse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub storage_capacity: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Warehouse {
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() { "Unnamed Node" } else { &self.name }
    }
}

/// `/warehouses` response: the list plus the alert badge count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarehouseOverview {
    pub warehouses: Vec<Warehouse>,
    pub alerts_count: u64,
}

impl WarehouseOverview {
    pub fn find(&self, warehouse_id: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id.as_deref() == Some(warehouse_id))
    }
}

/// `/getinfo_warehouse` response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarehouseDetail {
    pub warehouse: Option<Warehouse>,
    pub batches: Vec<Batch>,
}

impl WarehouseDetail {
    pub fn current_load(&self) -> f64 {
        self.batches.iter().map(|b| b.quantity).sum()
    }

    /// Load percentage for display, capped at 100.
    pub fn display_utilization(&self) -> f64 {
        let capacity = self.warehouse.as_ref().map(|w| w.storage_capacity).unwrap_or(0.0);
        percent_of(self.current_load(), capacity).min(100.0)
    }

    pub fn remove_batch(&mut self, batch_id: &str) -> bool {
        let before = self.batches.len();
        self.batches.retain(|b| b.id.as_deref() != Some(batch_id));
        self.batches.len() != before
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateWarehouseRequest {
    #[validate(custom(function = "validate_not_blank", message = "Node designation required"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank", message = "Geo-location required"))]
    pub location: String,
    #[validate(range(min = 1, message = "Valid storage capacity required"))]
    pub capacity: i64,
}

impl CreateWarehouseRequest {
    pub fn to_body(&self, mail: &str) -> Value {
        serde_json::json!({
            "name": self.name.trim(),
            "location": self.location.trim(),
            "capacity": self.capacity,
            "mail": mail,
        })
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::batch::Batch;

    fn batch(id: &str, quantity: f64) -> Batch {
        Batch {
            id: Some(id.to_string()),
            quantity,
            ..Batch::default()
        }
    }

    #[test]
    fn detail_load_and_capped_utilization() {
        let detail = WarehouseDetail {
            warehouse: Some(Warehouse {
                id: Some("w1".into()),
                storage_capacity: 40.0,
                ..Warehouse::default()
            }),
            batches: vec![batch("b1", 30.0), batch("b2", 20.0)],
        };
        assert_eq!(detail.current_load(), 50.0);
        assert_eq!(detail.display_utilization(), 100.0);
    }

    #[test]
    fn detail_without_warehouse_has_zero_utilization() {
        let detail = WarehouseDetail {
            warehouse: None,
            batches: vec![batch("b1", 10.0)],
        };
        assert_eq!(detail.display_utilization(), 0.0);
    }

    #[test]
    fn remove_batch_reports_whether_anything_changed() {
        let mut detail = WarehouseDetail {
            warehouse: None,
            batches: vec![batch("b1", 1.0), batch("b2", 2.0)],
        };
        assert!(detail.remove_batch("b1"));
        assert!(!detail.remove_batch("b1"));
        assert_eq!(detail.batches.len(), 1);
    }

    #[test]
    fn create_request_validation() {
        let ok = CreateWarehouseRequest {
            name: "North Hub".into(),
            location: "Oslo".into(),
            capacity: 500,
        };
        assert!(ok.validate().is_ok());

        let bad = CreateWarehouseRequest {
            name: "   ".into(),
            location: "".into(),
            capacity: 0,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("location"));
        assert!(fields.contains_key("capacity"));
    }

    #[test]
    fn create_body_is_trimmed() {
        let request = CreateWarehouseRequest {
            name: "  North Hub ".into(),
            location: " Oslo".into(),
            capacity: 500,
        };
        assert_eq!(
            request.to_body("ops@coldchain.io"),
            serde_json::json!({"name": "North Hub", "location": "Oslo", "capacity": 500, "mail": "ops@coldchain.io"})
        );
    }

    #[test]
    fn display_name_falls_back() {
        assert_eq!(Warehouse::default().display_name(), "Unnamed Node");
    }
}
