use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Alert {
    pub id: Option<String>,
    pub sensor_id: Option<String>,
    pub warehouse_id: Option<String>,
    pub alert_type: String,
    pub message: Option<String>,
    pub is_resolved: bool,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Alerts split the way the alert page shows them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlertBoard {
    pub unresolved: Vec<Alert>,
    pub resolved: Vec<Alert>,
}

impl AlertBoard {
    /// Partitions alerts, newest first within each group.
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let (mut unresolved, mut resolved): (Vec<_>, Vec<_>) = alerts.into_iter().partition(|a| !a.is_resolved);
        unresolved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        resolved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self { unresolved, resolved }
    }

    /// Marks every open alert resolved. Returns how many moved.
    pub fn resolve_all(&mut self) -> usize {
        let moved = self.unresolved.len();
        for mut alert in self.unresolved.drain(..) {
            alert.is_resolved = true;
            self.resolved.push(alert);
        }
        self.resolved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        moved
    }

    pub fn open_count(&self) -> usize {
        self.unresolved.len()
    }
}
