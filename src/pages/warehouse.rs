use crate::endpoints::batch::BatchEndpoints;
use crate::endpoints::warehouse::WarehouseEndpoints;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::warehouse::WarehouseDetail;
use crate::page::{LoadOutcome, Page};
use crate::storage::warehouse_context::WarehouseContextStore;

/// Detail view of the selected warehouse and its batches.
#[derive(Debug, Default)]
pub struct WarehousePage {
    page: Page<WarehouseDetail>,
}

impl WarehousePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<WarehouseDetail> {
        &self.page
    }

    pub async fn load(&mut self, gateway: &ApiGateway, context: &WarehouseContextStore) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = fetch_detail(gateway, context).await;
        self.page.finish(ticket, result)
    }

    /// Deletes a batch on the backend, then drops it from the list.
    pub async fn dispatch_batch(&mut self, gateway: &ApiGateway, batch_id: &str) -> Result<(), ClientError> {
        self.page.track(gateway.delete_batch(batch_id).await)?;
        self.page.update(|detail| {
            detail.remove_batch(batch_id);
        });
        Ok(())
    }
}

async fn fetch_detail(gateway: &ApiGateway, context: &WarehouseContextStore) -> Result<WarehouseDetail, ClientError> {
    let stored = context.require_current_warehouse()?;
    let warehouse_id = context.current_warehouse_id()?;

    let mut detail = gateway.warehouse_detail(&warehouse_id).await?;
    if detail.warehouse.is_none() {
        detail.warehouse = Some(stored);
    }
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::LoadState;
    use crate::test_utils::{MockReply, logged_in_env, sample_warehouse};
    use serde_json::json;

    #[tokio::test]
    async fn without_context_page_is_unavailable() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!({})));
        let mut page = WarehousePage::new();

        assert_eq!(page.load(&env.gateway, &env.context).await, LoadOutcome::Applied);
        assert!(matches!(page.page().state(), LoadState::Unavailable { .. }));
        assert!(env.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn stored_warehouse_fills_missing_server_copy() {
        let env = logged_in_env(|path, _| match path {
            "/getinfo_warehouse" => MockReply::Json(200, json!({"batches": [{"id": "b1", "quantity": 30}, {"id": "b2", "quantity": 50}]})),
            _ => MockReply::Text(200, String::new()),
        });
        env.context.set_current_warehouse(&sample_warehouse("w1", 40.0)).unwrap();
        let mut page = WarehousePage::new();

        page.load(&env.gateway, &env.context).await;
        let detail = page.page().data().unwrap();
        assert_eq!(detail.warehouse.as_ref().unwrap().id.as_deref(), Some("w1"));
        assert_eq!(detail.current_load(), 80.0);
        assert_eq!(detail.display_utilization(), 100.0);

        page.dispatch_batch(&env.gateway, "b1").await.unwrap();
        assert_eq!(page.page().data().unwrap().batches.len(), 1);
    }

    #[tokio::test]
    async fn failed_dispatch_keeps_batches() {
        let env = logged_in_env(|path, _| match path {
            "/getinfo_warehouse" => MockReply::Json(200, json!({"batches": [{"id": "b1", "quantity": 30}]})),
            _ => MockReply::Json(500, json!({"error": "cannot delete"})),
        });
        env.context.set_current_warehouse(&sample_warehouse("w1", 40.0)).unwrap();
        let mut page = WarehousePage::new();
        page.load(&env.gateway, &env.context).await;

        assert!(page.dispatch_batch(&env.gateway, "b1").await.is_err());
        assert_eq!(page.page().data().unwrap().batches.len(), 1);
        assert!(page.page().error().unwrap().contains("cannot delete"));
    }
}
