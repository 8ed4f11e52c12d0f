//! Server configuration.
//!
//! Values come from an optional TOML file (`KYC_CONFIG`, default
//! `kyc-review.toml`) and are then overridden by environment variables,
//! including those loaded from a `.env` file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_CONFIG_PATH: &str = "kyc-review.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Postgres,
    Memory,
}

impl DatabaseBackend {
    fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(invalid(key, format!("unsupported database backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Http,
    Memory,
}

impl StorageBackend {
    fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "memory" => Ok(Self::Memory),
            other => Err(invalid(key, format!("unsupported storage backend '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(invalid(key, format!("unsupported log format '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    /// Run `migrations/` against the database on startup
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Postgres,
            url: None,
            max_connections: 10,
            run_migrations: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base URL of the hosted file-storage service
    pub url: Option<String>,
    pub token: Option<String>,
    /// Upload timeout; shorter than the request timeout so that a slow
    /// provider surfaces as an upstream error
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Http,
            url: None,
            token: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info,kyc_review_server=debug,tower_http=info".to_string(),
        }
    }
}

/// Administrator created on startup when no user with this e-mail exists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,
    pub name: String,
    pub agency_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub request_timeout_secs: u64,
    pub session_cache_ttl_secs: u64,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout_secs: 30,
            session_cache_ttl_secs: 60,
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            log: LogConfig::default(),
            bootstrap_admin: None,
        }
    }
}

impl ServerConfig {
    /// Loads `.env`, the TOML file named by `KYC_CONFIG` and the process
    /// environment, in that order of precedence from lowest to highest.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("KYC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `KYC_*` and `DATABASE_URL` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(value) = lookup("KYC_BIND_ADDR") {
            self.bind_addr = value
                .parse()
                .map_err(|e| invalid("KYC_BIND_ADDR", format!("'{value}' is not a socket address: {e}")))?;
        }
        if let Some(value) = lookup("DATABASE_URL") {
            self.database.url = Some(value);
        }
        if let Some(value) = lookup("KYC_DATABASE_BACKEND") {
            self.database.backend = DatabaseBackend::parse("KYC_DATABASE_BACKEND", &value)?;
        }
        if let Some(value) = lookup("KYC_DB_MAX_CONNECTIONS") {
            self.database.max_connections = parse_positive("KYC_DB_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = lookup("KYC_STORAGE_BACKEND") {
            self.storage.backend = StorageBackend::parse("KYC_STORAGE_BACKEND", &value)?;
        }
        if let Some(value) = lookup("KYC_STORAGE_URL") {
            self.storage.url = Some(value);
        }
        if let Some(value) = lookup("KYC_STORAGE_TOKEN") {
            self.storage.token = Some(value);
        }
        if let Some(value) = lookup("KYC_STORAGE_TIMEOUT_SECS") {
            self.storage.timeout_secs = parse_positive("KYC_STORAGE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("KYC_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_positive("KYC_REQUEST_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = lookup("KYC_LOG_FORMAT") {
            self.log.format = LogFormat::parse("KYC_LOG_FORMAT", &value)?;
        }
        if let Some(value) = lookup("KYC_LOG_LEVEL") {
            self.log.level = value;
        }
        Ok(())
    }

    /// Checks settings that depend on each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_none() {
            return Err(invalid("DATABASE_URL", "required for the postgres backend"));
        }
        if self.storage.backend == StorageBackend::Http && self.storage.url.is_none() {
            return Err(invalid("KYC_STORAGE_URL", "required for the http storage backend"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("KYC_REQUEST_TIMEOUT_SECS", "must be greater than zero"));
        }
        if self.storage.timeout_secs == 0 || self.storage.timeout_secs >= self.request_timeout_secs {
            return Err(invalid(
                "KYC_STORAGE_TIMEOUT_SECS",
                format!(
                    "must be greater than zero and below the request timeout of {}s",
                    self.request_timeout_secs
                ),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage.timeout_secs)
    }

    pub fn session_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.session_cache_ttl_secs)
    }
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|_| invalid(key, format!("'{value}' is not a number")))?;
    if parsed <= T::default() {
        return Err(invalid(key, "must be greater than zero"));
    }
    Ok(parsed)
}
