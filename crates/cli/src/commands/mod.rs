pub mod add;
pub mod config;
pub mod migrate;
pub mod remove;
pub mod set;
pub mod show;

use std::sync::Arc;

use serde::Serialize;

use trolley_api::{HttpProductCatalog, HttpStockService};
use trolley_core::config::AppConfig;
use trolley_core::{CartLine, CartService, CartStore};
use trolley_db::{connect_with_settings, migrations, SqlCartSlot};

use crate::notifier::StderrNotifier;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cart: Option<Vec<LineView>>,
}

#[derive(Debug, Serialize)]
struct LineView {
    id: i64,
    name: String,
    price: String,
    amount: u32,
}

impl From<&CartLine> for LineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.0,
            name: line.name.clone(),
            price: line.price.to_string(),
            amount: line.amount,
        }
    }
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: Some(message.into()),
            cart: None,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn snapshot(command: &str, lines: &[CartLine]) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: None,
            cart: Some(lines.iter().map(LineView::from).collect()),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: Some(message.into()),
            cart: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|_| r#"{"status":"error","message":"output serialization failed"}"#.into())
}

type Failure = (&'static str, String, u8);

pub(crate) fn build_runtime() -> Result<tokio::runtime::Runtime, Failure> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        ("runtime_init", format!("failed to initialize async runtime: {error}"), 3)
    })
}

/// Wires the full cart stack for one command invocation: sqlite slot,
/// HTTP stock and catalog clients, stderr notices. Pending migrations
/// are applied first so the cart works on a fresh database.
pub(crate) async fn open_cart(config: &AppConfig) -> Result<CartService, Failure> {
    let pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

    migrations::run_pending(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), 5u8))?;

    let client = trolley_api::http_client(config.services.timeout_secs)
        .map_err(|error| ("runtime_init", error.to_string(), 3u8))?;
    let stock = Arc::new(HttpStockService::new(client.clone(), &config.services.stock_base_url));
    let catalog =
        Arc::new(HttpProductCatalog::new(client, &config.services.catalog_base_url));
    let slot = Arc::new(SqlCartSlot::new(pool, &config.cart.slot_key));

    let store = CartStore::restore(stock, catalog, slot)
        .await
        .map_err(|error| ("slot_read", error.to_string(), 4u8))?;

    Ok(CartService::new(store, Arc::new(StderrNotifier)))
}

pub(crate) fn fail(command: &str, failure: Failure) -> CommandResult {
    let (error_class, message, exit_code) = failure;
    CommandResult::failure(command, error_class, message, exit_code)
}
