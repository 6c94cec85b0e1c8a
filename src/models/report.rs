use serde::{Deserialize, Serialize};

/// Generated narrative report. The backend returns free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Report {
    pub report: String,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.report.trim().is_empty()
    }
}
