//! HTTP implementations of the trolley-core service ports.
//!
//! - [`HttpStockService`] — `GET {base}/stock/{product_id}`
//! - [`HttpProductCatalog`] — `GET {base}/products/{product_id}`
//!
//! Both share a `reqwest::Client`; the client's timeout is the only
//! deadline, there are no retries.

pub mod catalog;
pub mod stock;

use std::time::Duration;

use reqwest::Client;

pub use catalog::HttpProductCatalog;
pub use stock::HttpStockService;

/// Client used by both services, with the configured request timeout.
pub fn http_client(timeout_secs: u64) -> reqwest::Result<Client> {
    Client::builder().timeout(Duration::from_secs(timeout_secs.max(1))).build()
}

pub(crate) fn trim_base(base_url: impl Into<String>) -> String {
    let mut base = base_url.into();
    while base.ends_with('/') {
        base.pop();
    }
    base
}
