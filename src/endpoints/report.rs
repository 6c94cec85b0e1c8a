use crate::compatibility_adapter::coerce_number;
use crate::endpoints::mail_body;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::report::Report;
use crate::models::utilization::UtilitySummary;
use serde_json::Value;

/// Server-side analytics: the generated report and the `/utility` totals.
#[async_trait::async_trait]
pub trait ReportEndpoints: Send + Sync {
    async fn generate_report(&self) -> Result<Report, ClientError>;
    async fn utility_summary(&self) -> Result<UtilitySummary, ClientError>;
}

#[async_trait::async_trait]
impl ReportEndpoints for ApiGateway {
    async fn generate_report(&self) -> Result<Report, ClientError> {
        let mail = self.current_mail()?;
        let value = self.call("/generate-report", &mail_body(&mail)).await?;
        let report = match value.get("report") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Ok(Report { report })
    }

    async fn utility_summary(&self) -> Result<UtilitySummary, ClientError> {
        let mail = self.current_mail()?;
        let value = self.call("/utility", &mail_body(&mail)).await?;
        Ok(UtilitySummary::from_totals(
            coerce_number(value.get("totalCapacity")),
            coerce_number(value.get("totalOccupied")),
        ))
    }
}
