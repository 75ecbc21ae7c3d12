use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;

use trolley_core::domain::product::{Product, ProductId};
use trolley_core::errors::ServiceError;
use trolley_core::ports::ProductCatalog;

use crate::trim_base;

pub struct HttpProductCatalog {
    client: Client,
    base_url: String,
}

impl HttpProductCatalog {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self { client, base_url: trim_base(base_url) }
    }
}

/// Catalog wire format. camelCase per the upstream API; fields beyond
/// display data are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDto {
    id: i64,
    name: String,
    price: Decimal,
    image_url: String,
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        Self {
            id: ProductId(dto.id),
            name: dto.name,
            price: dto.price,
            image_url: dto.image_url,
        }
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        let url = format!("{}/products/{}", self.base_url, product_id);
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
                "catalog service returned {}",
                response.status()
            )));
        }

        let dto: ProductDto =
            response.json().await.map_err(|error| ServiceError::Decode(error.to_string()))?;
        Ok(dto.into())
    }
}
