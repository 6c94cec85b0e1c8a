use crate::compatibility_adapter::{adapt_list, adapt_product, unwrap_list, unwrap_object};
use crate::endpoints::mail_body;
use crate::error::app_error::ClientError;
use crate::gateway::ApiGateway;
use crate::models::product::{CreateProductRequest, Product};
use serde_json::json;
use validator::Validate;

#[async_trait::async_trait]
pub trait ProductEndpoints: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn create_product(&self, request: &CreateProductRequest) -> Result<Option<Product>, ClientError>;
    async fn delete_product(&self, product_id: &str) -> Result<(), ClientError>;
}

#[async_trait::async_trait]
impl ProductEndpoints for ApiGateway {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let mail = self.current_mail()?;
        let value = self.call("/getproducts", &mail_body(&mail)).await?;
        Ok(adapt_list(unwrap_list(value, "products"), adapt_product))
    }

    async fn create_product(&self, request: &CreateProductRequest) -> Result<Option<Product>, ClientError> {
        request.validate()?;
        let mail = self.current_mail()?;
        let value = self.call("/create-product", &request.to_body(&mail)).await?;
        Ok(unwrap_object(value, "product").and_then(|v| adapt_product(&v)))
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), ClientError> {
        let mail = self.current_mail()?;
        let body = json!({ "mail": mail, "product_id": product_id });
        self.call("/delete-product", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockReply, TEST_MAIL, logged_in_env};

    #[tokio::test]
    async fn list_accepts_bare_array_and_wrapped() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!([{"id": 1, "name": "Peas"}, {"id": 2, "name": "Fish"}])));
        assert_eq!(env.gateway.list_products().await.unwrap().len(), 2);

        let env = logged_in_env(|_, _| MockReply::Json(200, json!({"products": [{"id": 1, "name": "Peas"}]})));
        assert_eq!(env.gateway.list_products().await.unwrap()[0].name, "Peas");
    }

    #[tokio::test]
    async fn created_product_from_either_shape() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!({"product": {"product_id": 9, "name": "Fish"}})));
        let request = CreateProductRequest {
            name: "Fish".into(),
            description: String::new(),
            min_temp: Some(-20.0),
            max_temp: Some(-10.0),
            min_humi: Some(10.0),
            max_humi: Some(50.0),
        };
        let created = env.gateway.create_product(&request).await.unwrap().unwrap();
        assert_eq!(created.id.as_deref(), Some("9"));

        let env = logged_in_env(|_, _| MockReply::Json(200, json!({"id": 3, "name": "Ice"})));
        let created = env.gateway.create_product(&request).await.unwrap().unwrap();
        assert_eq!(created.id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn inverted_envelope_never_hits_network() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!({})));
        let request = CreateProductRequest {
            name: "Fish".into(),
            min_temp: Some(5.0),
            max_temp: Some(-10.0),
            min_humi: Some(10.0),
            max_humi: Some(50.0),
            ..CreateProductRequest::default()
        };
        assert!(matches!(env.gateway.create_product(&request).await, Err(ClientError::ValidationError(_))));
        assert!(env.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn nan_bounds_never_hit_network() {
        let env = logged_in_env(|_, _| MockReply::Json(200, json!({})));
        let request = CreateProductRequest {
            name: "Fish".into(),
            min_temp: Some(f64::NAN),
            max_temp: Some(-10.0),
            min_humi: Some(f64::NAN),
            max_humi: Some(50.0),
            ..CreateProductRequest::default()
        };
        assert!(matches!(env.gateway.create_product(&request).await, Err(ClientError::ValidationError(_))));
        assert!(env.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn delete_sends_product_id() {
        let env = logged_in_env(|_, _| MockReply::Text(204, String::new()));
        env.gateway.delete_product("p1").await.unwrap();
        assert_eq!(env.transport.requests()[0].body, json!({"mail": TEST_MAIL, "product_id": "p1"}));
    }
}
