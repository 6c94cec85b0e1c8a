use crate::service::service_util::percent_of;
use serde::Serialize;

/// Occupancy of one warehouse, derived from its batch list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarehouseUtilization {
    pub warehouse_id: Option<String>,
    pub name: String,
    pub normalized_capacity: f64,
    pub current_occupancy: f64,
    pub utilization_percent: f64,
}

impl WarehouseUtilization {
    pub fn band(&self) -> LoadBand {
        LoadBand::from_percent(self.utilization_percent)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UtilizationReport {
    pub warehouses: Vec<WarehouseUtilization>,
    pub total_capacity: f64,
    pub total_occupied: f64,
    pub global_utilization: f64,
}

/// Server-computed totals from `/utility`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UtilitySummary {
    pub total_capacity: f64,
    pub total_occupied: f64,
    pub utilization_percent: f64,
    pub used_text: String,
}

impl UtilitySummary {
    pub fn from_totals(total_capacity: f64, total_occupied: f64) -> Self {
        Self {
            total_capacity,
            total_occupied,
            utilization_percent: percent_of(total_occupied, total_capacity),
            used_text: format!("{}/{} used", total_occupied, total_capacity),
        }
    }

    pub fn band(&self) -> LoadBand {
        LoadBand::from_percent(self.utilization_percent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadBand {
    Normal,
    Warning,
    Critical,
}

impl LoadBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 90.0 {
            LoadBand::Critical
        } else if percent >= 75.0 {
            LoadBand::Warning
        } else {
            LoadBand::Normal
        }
    }
}
