use crate::endpoints::product::ProductEndpoints;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::product::{CreateProductRequest, Product};
use crate::page::{LoadOutcome, Page};

#[derive(Debug, Default)]
pub struct ProductsPage {
    page: Page<Vec<Product>>,
}

impl ProductsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page<Vec<Product>> {
        &self.page
    }

    pub async fn load(&mut self, gateway: &ApiGateway) -> LoadOutcome {
        let ticket = self.page.begin();
        let result = gateway.list_products().await;
        self.page.finish(ticket, result)
    }

    pub async fn create(&mut self, gateway: &ApiGateway, request: &CreateProductRequest) -> Result<Option<Product>, ClientError> {
        let created = self.page.track(gateway.create_product(request).await)?;
        if let Some(product) = &created {
            self.page.update(|products| products.push(product.clone()));
        }
        Ok(created)
    }

    pub async fn delete(&mut self, gateway: &ApiGateway, product_id: &str) -> Result<(), ClientError> {
        self.page.track(gateway.delete_product(product_id).await)?;
        self.page.update(|products| products.retain(|p| p.id.as_deref() != Some(product_id)));
        Ok(())
    }
}
