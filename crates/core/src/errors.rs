use thiserror::Error;

use crate::domain::product::ProductId;

/// Failure talking to the stock or catalog service.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("response decode failure: {0}")]
    Decode(String),
}

/// Failure reading or writing the persistence slot.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("slot backend failure: {0}")]
    Backend(String),
}

/// Anything that aborts a cart operation before it can commit or be
/// cleanly rejected. Never reaches the presentation layer as a fault;
/// [`crate::CartService`] absorbs it into a notice.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Slot(#[from] SlotError),
    #[error("cart serialization failure: {0}")]
    Serialize(String),
}
