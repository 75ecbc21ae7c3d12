use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub services: ServicesConfig,
    pub database: DatabaseConfig,
    pub cart: CartConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServicesConfig {
    pub stock_base_url: String,
    pub catalog_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CartConfig {
    /// Fixed key of the persistence slot row.
    pub slot_key: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub stock_base_url: Option<String>,
    pub catalog_base_url: Option<String>,
    pub database_url: Option<String>,
    pub slot_key: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            services: ServicesConfig {
                stock_base_url: "http://localhost:3333".to_string(),
                catalog_base_url: "http://localhost:3333".to_string(),
                timeout_secs: 10,
            },
            database: DatabaseConfig {
                url: "sqlite://trolley.db".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            cart: CartConfig { slot_key: "cart".to_string() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    services: Option<ServicesPatch>,
    database: Option<DatabasePatch>,
    cart: Option<CartPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServicesPatch {
    stock_base_url: Option<String>,
    catalog_base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CartPatch {
    slot_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Defaults, then the optional TOML patch file, then `TROLLEY_*`
    /// environment variables, then programmatic overrides, then
    /// validation.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("trolley.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(services) = patch.services {
            if let Some(stock_base_url) = services.stock_base_url {
                self.services.stock_base_url = stock_base_url;
            }
            if let Some(catalog_base_url) = services.catalog_base_url {
                self.services.catalog_base_url = catalog_base_url;
            }
            if let Some(timeout_secs) = services.timeout_secs {
                self.services.timeout_secs = timeout_secs;
            }
        }

        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(cart) = patch.cart {
            if let Some(slot_key) = cart.slot_key {
                self.cart.slot_key = slot_key;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TROLLEY_STOCK_BASE_URL") {
            self.services.stock_base_url = value;
        }
        if let Some(value) = read_env("TROLLEY_CATALOG_BASE_URL") {
            self.services.catalog_base_url = value;
        }
        if let Some(value) = read_env("TROLLEY_SERVICES_TIMEOUT_SECS") {
            self.services.timeout_secs = parse_u64("TROLLEY_SERVICES_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("TROLLEY_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("TROLLEY_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("TROLLEY_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("TROLLEY_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("TROLLEY_DATABASE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("TROLLEY_CART_SLOT_KEY") {
            self.cart.slot_key = value;
        }
        if let Some(value) = read_env("TROLLEY_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("TROLLEY_LOG_FORMAT") {
            self.logging.format = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "TROLLEY_LOG_FORMAT".to_string(),
                value,
            })?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(stock_base_url) = overrides.stock_base_url {
            self.services.stock_base_url = stock_base_url;
        }
        if let Some(catalog_base_url) = overrides.catalog_base_url {
            self.services.catalog_base_url = catalog_base_url;
        }
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(slot_key) = overrides.slot_key {
            self.cart.slot_key = slot_key;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("services.stock_base_url", &self.services.stock_base_url),
            ("services.catalog_base_url", &self.services.catalog_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{name} must be an http(s) URL, got `{url}`"
                )));
            }
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation("database.url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.cart.slot_key.trim().is_empty() {
            return Err(ConfigError::Validation("cart.slot_key must not be empty".to_string()));
        }

        Ok(())
    }
}

fn resolve_config_path(requested: Option<&Path>) -> Option<PathBuf> {
    match requested {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(_) => None,
        None => {
            let default = PathBuf::from("trolley.toml");
            default.exists().then_some(default)
        }
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
