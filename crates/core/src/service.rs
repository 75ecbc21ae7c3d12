use std::sync::Arc;

use tracing::debug;

use crate::domain::cart::CartLine;
use crate::domain::product::ProductId;
use crate::notice::{Notice, Notifier};
use crate::store::{CartStore, Outcome, Rejection};

/// Notification layer over [`CartStore`].
///
/// The store reports tagged outcomes and hard errors; this wrapper turns
/// them into the fixed shopper-facing notices and absorbs every failure.
/// Nothing here ever propagates as a fault — each method hands back the
/// current snapshot whatever happened.
pub struct CartService {
    store: CartStore,
    notifier: Arc<dyn Notifier>,
}

impl CartService {
    pub fn new(store: CartStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn cart(&self) -> &[CartLine] {
        self.store.cart().lines()
    }

    pub async fn add_product(&mut self, product_id: ProductId) -> Vec<CartLine> {
        let outcome = self.store.add_product(product_id).await;
        self.settle(outcome, Notice::AddFailed).await
    }

    pub async fn remove_product(&mut self, product_id: ProductId) -> Vec<CartLine> {
        let outcome = self.store.remove_product(product_id).await;
        self.settle(outcome, Notice::RemoveFailed).await
    }

    pub async fn update_amount(&mut self, product_id: ProductId, amount: u32) -> Vec<CartLine> {
        let outcome = self.store.update_amount(product_id, amount).await;
        self.settle(outcome, Notice::UpdateFailed).await
    }

    async fn settle(
        &mut self,
        outcome: Result<Outcome, crate::errors::StoreError>,
        generic: Notice,
    ) -> Vec<CartLine> {
        match outcome {
            Ok(Outcome::Committed(snapshot)) => snapshot,
            Ok(Outcome::Rejected(Rejection::OutOfStock)) => {
                self.notifier.notify(Notice::OutOfStock).await;
                self.cart().to_vec()
            }
            Ok(Outcome::Rejected(Rejection::NotInCart)) => {
                self.notifier.notify(generic).await;
                self.cart().to_vec()
            }
            // A zero quantity is ignored without telling the shopper.
            Ok(Outcome::Rejected(Rejection::AmountNotPositive)) => self.cart().to_vec(),
            Err(error) => {
                debug!(%error, "cart operation failed, absorbing into notice");
                self.notifier.notify(generic).await;
                self.cart().to_vec()
            }
        }
    }
}
