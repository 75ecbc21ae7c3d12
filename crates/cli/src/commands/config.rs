use serde_json::json;

use trolley_core::config::{AppConfig, LogFormat};

use crate::commands::CommandResult;

pub fn run(config: &AppConfig) -> CommandResult {
    let format = match config.logging.format {
        LogFormat::Compact => "compact",
        LogFormat::Pretty => "pretty",
        LogFormat::Json => "json",
    };

    let view = json!({
        "command": "config",
        "status": "ok",
        "effective": {
            "services": {
                "stock_base_url": config.services.stock_base_url,
                "catalog_base_url": config.services.catalog_base_url,
                "timeout_secs": config.services.timeout_secs,
            },
            "database": {
                "url": config.database.url,
                "max_connections": config.database.max_connections,
                "timeout_secs": config.database.timeout_secs,
            },
            "cart": { "slot_key": config.cart.slot_key },
            "logging": { "level": config.logging.level, "format": format },
        },
    });

    let output = serde_json::to_string_pretty(&view)
        .unwrap_or_else(|_| r#"{"status":"error","message":"output serialization failed"}"#.into());
    CommandResult { exit_code: 0, output }
}
