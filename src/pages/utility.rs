use crate::endpoints::report::ReportEndpoints;
use crate::gateway::ApiGateway;
use crate::models::utilization::{UtilitySummary, UtilizationReport};
use crate::page::{LoadOutcome, Page};
use crate::service::utilization::collect_utilization;

/// Utilization view. The breakdown is computed here from every warehouse's
/// batches; the summary is the backend's own totals.
#[derive(Debug, Default)]
pub struct UtilityPage {
    breakdown: Page<UtilizationReport>,
    summary: Page<UtilitySummary>,
}

impl UtilityPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn breakdown(&self) -> &Page<UtilizationReport> {
        &self.breakdown
    }

    pub fn summary(&self) -> &Page<UtilitySummary> {
        &self.summary
    }

    pub async fn load_breakdown(&mut self, gateway: &ApiGateway) -> LoadOutcome {
        let ticket = self.breakdown.begin();
        let result = collect_utilization(gateway).await;
        self.breakdown.finish(ticket, result)
    }

    pub async fn load_summary(&mut self, gateway: &ApiGateway) -> LoadOutcome {
        let ticket = self.summary.begin();
        let result = gateway.utility_summary().await;
        self.summary.finish(ticket, result)
    }
}
