use crate::endpoints::report::ReportEndpoints;
use crate::gateway::ApiGateway;
use crate::models::report::Report;
use crate::page::{LoadOutcome, Page};

#[derive(Debug, Default)]
pub struct ReportPage {
    page: Page<Report>,
}

impl ReportPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<Report> {
        &self.page
    }

    /// Report generation is slow on the backend, so it only runs on request.
    pub async fn generate(&mut self, gateway: &ApiGateway) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = gateway.generate_report().await;
        self.page.finish(ticket, result)
    }
}
