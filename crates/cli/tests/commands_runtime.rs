use serde_json::Value;

use trolley_cli::commands::{migrate, remove, show};
use trolley_core::config::AppConfig;

fn config_with_db(url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = url.to_string();
    config
}

fn temp_db() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("trolley.db").display());
    (dir, url)
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output is JSON")
}

#[test]
fn migrate_succeeds_on_a_fresh_database() {
    let (_dir, url) = temp_db();

    let result = migrate::run(&config_with_db(&url));

    assert_eq!(result.exit_code, 0, "expected successful migrate run");
    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "migrate");
    assert_eq!(payload["status"], "ok");
}

#[test]
fn show_reports_an_empty_cart_on_a_fresh_database() {
    let (_dir, url) = temp_db();

    let result = show::run(&config_with_db(&url));

    assert_eq!(result.exit_code, 0);
    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["cart"], Value::Array(vec![]));
}

// Remove never consults the stock service, so this exercises the whole
// stack (slot restore, operation, notice) without a network.
#[test]
fn remove_from_an_empty_cart_is_a_clean_rejection() {
    let (_dir, url) = temp_db();

    let result = remove::run(&config_with_db(&url), 1);

    assert_eq!(result.exit_code, 0);
    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "remove");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["cart"], Value::Array(vec![]));
}

#[test]
fn unreachable_database_maps_to_the_db_exit_code() {
    let result = show::run(&config_with_db("sqlite:///no-such-dir/trolley.db"));

    assert_eq!(result.exit_code, 4);
    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "db_connectivity");
}
