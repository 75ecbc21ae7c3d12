//! Collaborator seams for the cart store.
//!
//! The store never talks to the network or to storage directly; it is
//! constructed with implementations of these traits. Production
//! implementations live in `trolley-api` (HTTP) and `trolley-db`
//! (sqlite); [`InMemoryCartSlot`] is the deterministic test double.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::product::{Product, ProductId, StockLevel};
use crate::errors::{ServiceError, SlotError};

/// Read-only lookup of the maximum purchasable quantity for a product.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn stock_level(&self, product_id: ProductId) -> Result<StockLevel, ServiceError>;
}

/// Read-only lookup of product display data.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, product_id: ProductId) -> Result<Product, ServiceError>;
}

/// A single named durable location for the serialized cart.
///
/// Read once at store initialization, overwritten wholesale on every
/// successful mutation.
#[async_trait]
pub trait CartSlot: Send + Sync {
    async fn read(&self) -> Result<Option<String>, SlotError>;
    async fn write(&self, payload: &str) -> Result<(), SlotError>;
}

#[derive(Default)]
pub struct InMemoryCartSlot {
    payload: RwLock<Option<String>>,
}

impl InMemoryCartSlot {
    pub fn seeded(payload: impl Into<String>) -> Self {
        Self { payload: RwLock::new(Some(payload.into())) }
    }
}

#[async_trait]
impl CartSlot for InMemoryCartSlot {
    async fn read(&self) -> Result<Option<String>, SlotError> {
        let payload = self.payload.read().await;
        Ok(payload.clone())
    }

    async fn write(&self, payload: &str) -> Result<(), SlotError> {
        let mut slot = self.payload.write().await;
        *slot = Some(payload.to_string());
        Ok(())
    }
}
