use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use trolley_core::errors::ServiceError;
use trolley_core::domain::product::{ProductId, StockLevel};
use trolley_core::ports::StockService;

use crate::trim_base;

pub struct HttpStockService {
    client: Client,
    base_url: String,
}

impl HttpStockService {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: trim_base(base_url) }
    }
}

#[derive(Debug, Deserialize)]
struct StockDto {
    amount: u32,
}

#[async_trait]
impl StockService for HttpStockService {
    async fn stock_level(&self, product_id: ProductId) -> Result<StockLevel, ServiceError> {
        let url = format!("{}/stock/{}", self.base_url, product_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|error| ServiceError::Transport(error.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(product_id));
        }
        if !response.status().is_success() {
            return Err(ServiceError::Transport(format!(
                "stock service returned {}",
                response.status()
            )));
        }

        let dto: StockDto =
            response.json().await.map_err(|error| ServiceError::Decode(error.to_string()))?;
        Ok(StockLevel { product_id, amount: dto.amount })
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Client;

    use trolley_core::domain::product::ProductId;
    use trolley_core::errors::ServiceError;
    use trolley_core::ports::StockService;

    use super::HttpStockService;

    #[tokio::test]
    async fn reads_the_amount_for_a_product() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"amount":5}"#)
            .create_async()
            .await;

        let service = HttpStockService::new(Client::new(), server.url());
        let level = service.stock_level(ProductId(1)).await.expect("stock lookup");

        assert_eq!(level.amount, 5);
        assert_eq!(level.product_id, ProductId(1));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_product_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/stock/99").with_status(404).create_async().await;

        let service = HttpStockService::new(Client::new(), server.url());
        let error = service.stock_level(ProductId(99)).await.expect_err("404");

        assert_eq!(error, ServiceError::NotFound(ProductId(99)));
    }

    #[tokio::test]
    async fn server_error_maps_to_transport() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/stock/1").with_status(503).create_async().await;

        let service = HttpStockService::new(Client::new(), server.url());
        let error = service.stock_level(ProductId(1)).await.expect_err("503");

        assert!(matches!(error, ServiceError::Transport(_)));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_decode() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"amount":"plenty"}"#)
            .create_async()
            .await;

        let service = HttpStockService::new(Client::new(), server.url());
        let error = service.stock_level(ProductId(1)).await.expect_err("bad body");

        assert!(matches!(error, ServiceError::Decode(_)));
    }
}
