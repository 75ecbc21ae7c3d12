pub mod config;
pub mod domain;
pub mod errors;
pub mod notice;
pub mod ports;
pub mod service;
pub mod store;

pub use domain::cart::{Cart, CartLine};
pub use domain::product::{Product, ProductId, StockLevel};
pub use errors::{ServiceError, SlotError, StoreError};
pub use notice::{Notice, Notifier, RecordingNotifier};
pub use ports::{CartSlot, InMemoryCartSlot, ProductCatalog, StockService};
pub use service::CartService;
pub use store::{CartStore, Outcome, Rejection};
