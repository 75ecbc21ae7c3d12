use std::sync::Arc;

use tracing::warn;

use crate::domain::cart::{Cart, CartLine};
use crate::domain::product::ProductId;
use crate::errors::{SlotError, StoreError};
use crate::ports::{CartSlot, ProductCatalog, StockService};

/// How an operation left the cart.
///
/// `Committed` carries the snapshot after the mutation was persisted;
/// `Rejected` means a validation condition stopped the operation before
/// any mutation. Hard failures (service or slot trouble) surface as
/// [`StoreError`] instead.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Committed(Vec<CartLine>),
    Rejected(Rejection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The requested quantity exceeds what the stock service reports.
    OutOfStock,
    /// The product has no line in the cart.
    NotInCart,
    /// A requested quantity of zero; ignored without ceremony.
    AmountNotPositive,
}

/// The cart store: the in-memory line sequence plus its collaborators.
///
/// Each operation fully commits (mutate + persist) or leaves state
/// untouched. Operations are independent; there is no transaction
/// spanning two of them.
pub struct CartStore {
    cart: Cart,
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    slot: Arc<dyn CartSlot>,
}

impl CartStore {
    /// Builds a store from whatever the slot currently holds. An absent
    /// payload starts an empty cart; an unusable one (corrupt JSON,
    /// violated invariants) is logged and also starts empty rather than
    /// failing initialization.
    pub async fn restore(
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn ProductCatalog>,
        slot: Arc<dyn CartSlot>,
    ) -> Result<Self, SlotError> {
        let cart = match slot.read().await? {
            None => Cart::default(),
            Some(payload) => match Cart::from_payload(&payload) {
                Ok(cart) => cart,
                Err(error) => {
                    warn!(%error, "persisted cart payload is unusable, starting empty");
                    Cart::default()
                }
            },
        };

        Ok(Self { cart, stock, catalog, slot })
    }

    /// Current snapshot, read-only to consumers.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Adds one unit of the product, appending a new line on first add.
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<Outcome, StoreError> {
        let stock = self.stock.stock_level(product_id).await?;

        let existing = self.cart.find(product_id);
        // A line already at u32::MAX cannot grow; past that point the
        // request exceeds any stock level.
        let candidate_amount = match existing {
            Some(line) => match line.amount.checked_add(1) {
                Some(amount) => amount,
                None => return Ok(Outcome::Rejected(Rejection::OutOfStock)),
            },
            None => 1,
        };
        if candidate_amount > stock.amount {
            return Ok(Outcome::Rejected(Rejection::OutOfStock));
        }

        let candidate = if existing.is_some() {
            self.cart.with_line_amount(product_id, candidate_amount)
        } else {
            let product = self.catalog.product(product_id).await?;
            self.cart.with_appended(CartLine::first_of(product))
        };

        self.commit(candidate).await
    }

    /// Drops the product's line entirely.
    pub async fn remove_product(&mut self, product_id: ProductId) -> Result<Outcome, StoreError> {
        if self.cart.find(product_id).is_none() {
            return Ok(Outcome::Rejected(Rejection::NotInCart));
        }

        let candidate = self.cart.without(product_id);
        self.commit(candidate).await
    }

    /// Replaces the product's quantity outright, subject to stock.
    pub async fn update_amount(
        &mut self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<Outcome, StoreError> {
        if amount == 0 {
            return Ok(Outcome::Rejected(Rejection::AmountNotPositive));
        }
        if self.cart.find(product_id).is_none() {
            return Ok(Outcome::Rejected(Rejection::NotInCart));
        }

        let stock = self.stock.stock_level(product_id).await?;
        if amount > stock.amount {
            return Ok(Outcome::Rejected(Rejection::OutOfStock));
        }

        let candidate = self.cart.with_line_amount(product_id, amount);
        self.commit(candidate).await
    }

    // Persist first, swap second: a slot failure must never leave the
    // in-memory cart ahead of the durable one.
    async fn commit(&mut self, candidate: Cart) -> Result<Outcome, StoreError> {
        let payload =
            candidate.to_payload().map_err(|error| StoreError::Serialize(error.to_string()))?;
        self.slot.write(&payload).await?;
        self.cart = candidate;
        Ok(Outcome::Committed(self.cart.lines().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::{CartStore, Outcome, Rejection};
    use crate::domain::cart::Cart;
    use crate::domain::product::{Product, ProductId, StockLevel};
    use crate::errors::{ServiceError, SlotError, StoreError};
    use crate::ports::{CartSlot, InMemoryCartSlot, ProductCatalog, StockService};

    struct StockTable(HashMap<i64, u32>);

    #[async_trait]
    impl StockService for StockTable {
        async fn stock_level(&self, product_id: ProductId) -> Result<StockLevel, ServiceError> {
            self.0
                .get(&product_id.0)
                .map(|amount| StockLevel { product_id, amount: *amount })
                .ok_or(ServiceError::NotFound(product_id))
        }
    }

    struct UnreachableStock;

    #[async_trait]
    impl StockService for UnreachableStock {
        async fn stock_level(&self, _: ProductId) -> Result<StockLevel, ServiceError> {
            Err(ServiceError::Transport("connection refused".to_string()))
        }
    }

    struct CatalogTable(HashMap<i64, Product>);

    #[async_trait]
    impl ProductCatalog for CatalogTable {
        async fn product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
            self.0.get(&product_id.0).cloned().ok_or(ServiceError::NotFound(product_id))
        }
    }

    struct ReadOnlySlot;

    #[async_trait]
    impl CartSlot for ReadOnlySlot {
        async fn read(&self) -> Result<Option<String>, SlotError> {
            Ok(None)
        }

        async fn write(&self, _: &str) -> Result<(), SlotError> {
            Err(SlotError::Backend("disk full".to_string()))
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Sneaker {id}"),
            price: Decimal::new(19990, 2),
            image_url: format!("https://cdn.example.com/{id}.jpg"),
        }
    }

    fn catalog(ids: &[i64]) -> Arc<CatalogTable> {
        Arc::new(CatalogTable(ids.iter().map(|id| (*id, product(*id))).collect()))
    }

    fn stock(levels: &[(i64, u32)]) -> Arc<StockTable> {
        Arc::new(StockTable(levels.iter().copied().collect()))
    }

    async fn store_with(
        stock_levels: &[(i64, u32)],
        catalog_ids: &[i64],
        slot: Arc<dyn CartSlot>,
    ) -> CartStore {
        CartStore::restore(stock(stock_levels), catalog(catalog_ids), slot)
            .await
            .expect("restore")
    }

    #[tokio::test]
    async fn repeated_adds_accumulate_into_one_line() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 5)], &[1], slot).await;

        for _ in 0..3 {
            let outcome = store.add_product(ProductId(1)).await.expect("add");
            assert!(matches!(outcome, Outcome::Committed(_)));
        }

        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().find(ProductId(1)).map(|l| l.amount), Some(3));
    }

    #[tokio::test]
    async fn add_stops_at_the_stock_ceiling() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 5)], &[1], slot).await;

        for _ in 0..5 {
            store.add_product(ProductId(1)).await.expect("add within stock");
        }
        let sixth = store.add_product(ProductId(1)).await.expect("sixth add");

        assert_eq!(sixth, Outcome::Rejected(Rejection::OutOfStock));
        assert_eq!(store.cart().find(ProductId(1)).map(|l| l.amount), Some(5));
    }

    #[tokio::test]
    async fn add_at_the_u32_ceiling_is_rejected_not_wrapped() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, u32::MAX)], &[1], slot).await;

        store.add_product(ProductId(1)).await.expect("first add");
        store.update_amount(ProductId(1), u32::MAX).await.expect("raise to the ceiling");
        let outcome = store.add_product(ProductId(1)).await.expect("add past the ceiling");

        assert_eq!(outcome, Outcome::Rejected(Rejection::OutOfStock));
        assert_eq!(store.cart().find(ProductId(1)).map(|l| l.amount), Some(u32::MAX));
    }

    #[tokio::test]
    async fn add_of_unknown_product_is_a_service_error() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[], &[], slot).await;

        let error = store.add_product(ProductId(42)).await.expect_err("no stock record");

        assert_eq!(error, StoreError::Service(ServiceError::NotFound(ProductId(42))));
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn stock_outage_aborts_add_without_mutation() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store =
            CartStore::restore(Arc::new(UnreachableStock), catalog(&[1]), slot.clone())
                .await
                .expect("restore");

        store.add_product(ProductId(1)).await.expect_err("stock is down");

        assert!(store.cart().is_empty());
        assert_eq!(slot.read().await.expect("read"), None);
    }

    #[tokio::test]
    async fn slot_failure_aborts_commit_and_leaves_memory_alone() {
        let mut store = store_with(&[(1, 5)], &[1], Arc::new(ReadOnlySlot)).await;

        let error = store.add_product(ProductId(1)).await.expect_err("write must fail");

        assert!(matches!(error, StoreError::Slot(_)));
        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn remove_keeps_remainder_order() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 9), (2, 9), (3, 9)], &[1, 2, 3], slot).await;
        for id in [1, 2, 3] {
            store.add_product(ProductId(id)).await.expect("add");
        }

        let outcome = store.remove_product(ProductId(2)).await.expect("remove");

        assert!(matches!(outcome, Outcome::Committed(_)));
        let ids: Vec<i64> = store.cart().lines().iter().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn remove_of_absent_product_is_rejected() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 5)], &[1], slot.clone()).await;

        let outcome = store.remove_product(ProductId(1)).await.expect("remove");

        assert_eq!(outcome, Outcome::Rejected(Rejection::NotInCart));
        assert_eq!(slot.read().await.expect("read"), None);
    }

    #[tokio::test]
    async fn update_bounds() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 5)], &[1], slot).await;
        store.add_product(ProductId(1)).await.expect("add");

        let zero = store.update_amount(ProductId(1), 0).await.expect("zero");
        assert_eq!(zero, Outcome::Rejected(Rejection::AmountNotPositive));

        let beyond = store.update_amount(ProductId(1), 6).await.expect("beyond stock");
        assert_eq!(beyond, Outcome::Rejected(Rejection::OutOfStock));
        assert_eq!(store.cart().find(ProductId(1)).map(|l| l.amount), Some(1));

        let ok = store.update_amount(ProductId(1), 5).await.expect("within stock");
        assert!(matches!(ok, Outcome::Committed(_)));
        assert_eq!(store.cart().find(ProductId(1)).map(|l| l.amount), Some(5));
    }

    #[tokio::test]
    async fn update_of_absent_product_is_rejected_without_a_write() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 5)], &[1], slot.clone()).await;

        let outcome = store.update_amount(ProductId(1), 2).await.expect("update");

        assert_eq!(outcome, Outcome::Rejected(Rejection::NotInCart));
        assert_eq!(slot.read().await.expect("read"), None);
    }

    #[tokio::test]
    async fn every_commit_round_trips_through_the_slot() {
        let slot = Arc::new(InMemoryCartSlot::default());
        let mut store = store_with(&[(1, 5), (2, 5)], &[1, 2], slot.clone()).await;
        store.add_product(ProductId(1)).await.expect("add 1");
        store.add_product(ProductId(2)).await.expect("add 2");
        store.update_amount(ProductId(2), 4).await.expect("update 2");

        let payload = slot.read().await.expect("read").expect("payload present");
        let persisted = Cart::from_payload(&payload).expect("parse");
        assert_eq!(&persisted, store.cart());

        let reopened =
            CartStore::restore(stock(&[(1, 5), (2, 5)]), catalog(&[1, 2]), slot).await.expect("restore");
        assert_eq!(reopened.cart(), store.cart());
    }

    #[tokio::test]
    async fn corrupt_slot_payload_restores_as_empty() {
        let slot = Arc::new(InMemoryCartSlot::seeded("{definitely not a cart"));

        let store = CartStore::restore(stock(&[]), catalog(&[]), slot).await.expect("restore");

        assert!(store.cart().is_empty());
    }
}
