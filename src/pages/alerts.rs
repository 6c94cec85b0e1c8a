use crate::endpoints::alert::AlertEndpoints;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::alert::AlertBoard;
use crate::page::{LoadOutcome, Page};
use tracing::info;

#[derive(Debug, Default)]
pub struct AlertsPage {
    page: Page<AlertBoard>,
}

impl AlertsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<AlertBoard> {
        &self.page
    }

    pub async fn load(&mut self, gateway: &ApiGateway) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = gateway.list_alerts().await.map(AlertBoard::from_alerts);
        self.page.finish(ticket, result)
    }

    /// Resolves every open alert on the backend, then moves them locally
    /// without a reload. Returns how many moved.
    pub async fn resolve_all(&mut self, gateway: &ApiGateway) -> Result<usize, ClientError> {
        self.page.track(gateway.resolve_all_alerts().await)?;

        let mut moved = 0;
        self.page.update(|board| moved = board.resolve_all());
        info!(resolved = moved, "alerts resolved");
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockReply, logged_in_env};
    use serde_json::json;

    #[tokio::test]
    async fn resolve_all_moves_open_alerts() {
        let env = logged_in_env(|path, _| match path {
            "/alerts" => MockReply::Json(
                200,
                json!({"alerts": [{"id": 1, "is_resolved": false}, {"id": 2, "is_resolved": false}, {"id": 3, "is_resolved": true}]}),
            ),
            _ => MockReply::Json(200, json!({"message": "ok"})),
        });
        let mut page = AlertsPage::new();
        page.load(&env.gateway).await;
        assert_eq!(page.page().data().unwrap().open_count(), 2);

        assert_eq!(page.resolve_all(&env.gateway).await.unwrap(), 2);
        let board = page.page().data().unwrap();
        assert_eq!(board.open_count(), 0);
        assert_eq!(board.resolved.len(), 3);
        assert!(board.resolved.iter().all(|a| a.is_resolved));
    }

    #[tokio::test]
    async fn failed_resolution_keeps_alerts_open() {
        let env = logged_in_env(|path, _| match path {
            "/alerts" => MockReply::Json(200, json!({"alerts": [{"id": 1, "is_resolved": false}]})),
            _ => MockReply::NetworkDown,
        });
        let mut page = AlertsPage::new();
        page.load(&env.gateway).await;

        assert!(page.resolve_all(&env.gateway).await.is_err());
        assert_eq!(page.page().data().unwrap().open_count(), 1);
        assert!(page.page().error().is_some());
    }
}
