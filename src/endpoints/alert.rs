use crate::compatibility_adapter::{adapt_alert, adapt_list, unwrap_list};
use crate::endpoints::mail_body;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::alert::Alert;

#[async_trait::async_trait]
pub trait AlertEndpoints: Send + Sync {
    async fn list_alerts(&self) -> Result<Vec<Alert>, ClientError>;
    async fn resolve_all_alerts(&self) -> Result<(), ClientError>;
}

#[async_trait::async_trait]
impl AlertEndpoints for ApiGateway {
    async fn list_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        let mail = self.current_mail()?;
        let value = self.call("/alerts", &mail_body(&mail)).await?;
        Ok(adapt_list(unwrap_list(value, "alerts"), adapt_alert))
    }

    async fn resolve_all_alerts(&self) -> Result<(), ClientError> {
        let mail = self.current_mail()?;
        self.call("/alerts/resolve-all", &mail_body(&mail)).await?;
        Ok(())
    }
}
