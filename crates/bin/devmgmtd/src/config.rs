//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `devmgmt.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use devmgmt_domain::telemetry::Producer;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Identity and local files of this device.
    pub device: DeviceConfig,
    /// Remote location API.
    pub location_api: LocationApiConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Identifier stamped on telemetry events.
    pub id: String,
    /// Telemetry `context.channel`.
    pub channel: String,
    /// Telemetry `context.env`.
    pub env: String,
    /// File holding the installed system version.
    pub version_file: PathBuf,
    /// Root of the bundled datasets (`location/`, `resourceBundles/`).
    pub data_dir: PathBuf,
}

/// The remote API is only used when `base_url` is set.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LocationApiConfig {
    pub base_url: Option<String>,
    pub token: String,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from `devmgmt.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("devmgmt.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DEVMGMT_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("DEVMGMT_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("DEVMGMT_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("DEVMGMT_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("DEVMGMT_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("DEVMGMT_DEVICE_ID") {
            self.device.id = val;
        }
        if let Some(val) = var("DEVMGMT_TELEMETRY_CHANNEL") {
            self.device.channel = val;
        }
        if let Some(val) = var("DEVMGMT_TELEMETRY_ENV") {
            self.device.env = val;
        }
        if let Some(val) = var("DEVMGMT_VERSION_FILE") {
            self.device.version_file = PathBuf::from(val);
        }
        if let Some(val) = var("DEVMGMT_DATA_DIR") {
            self.device.data_dir = PathBuf::from(val);
        }
        if let Some(val) = var("APP_BASE_URL") {
            self.location_api.base_url = Some(val).filter(|url| !url.trim().is_empty());
        }
        if let Some(val) = var("APP_BASE_URL_TOKEN") {
            self.location_api.token = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.device.id.trim().is_empty() {
            return Err(ConfigError::Validation("device id must not be empty".to_string()));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Identity stamped on every telemetry event.
    #[must_use]
    pub fn producer(&self) -> Producer {
        Producer::new(self.device.id.clone())
            .with_channel(self.device.channel.clone())
            .with_env(self.device.env.clone())
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Request timeout for the remote location API.
    #[must_use]
    pub fn location_api_timeout(&self) -> Duration {
        Duration::from_secs(self.location_api.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:devmgmt.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "devmgmtd=info,devmgmt=info,telemetry=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: "devmgmt-device".to_string(),
            channel: "OpenRAP".to_string(),
            env: "Device Management".to_string(),
            version_file: PathBuf::from("version.txt"),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl Default for LocationApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
