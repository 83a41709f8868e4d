//! Configuration for Folio
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `FOLIO_*` environment variables. The server applies command-line flags
//! last.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::types::{Error, PutSemantics, Result};
use crate::{log_debug, log_info};

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Output formats accepted by `logging.format`
pub const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Available storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// One JSON file per document under `data_dir`
    #[default]
    File,
    /// Process-local map, lost on exit
    Memory,
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StorageType::File),
            "memory" => Ok(StorageType::Memory),
            other => Err(format!("Invalid storage type: {}. Valid options: file, memory", other)),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,

    /// Allow cross-origin requests from any origin
    pub cors_permissive: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type
    pub storage_type: StorageType,

    /// Root directory of the file backend
    pub data_dir: PathBuf,

    /// How PUT combines the body with the stored document
    pub put_semantics: PutSemantics,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,

    /// Output format: pretty, compact or json
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            cors_permissive: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::File,
            data_dir: PathBuf::from("./data"),
            put_semantics: PutSemantics::Replace,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Apply `FOLIO_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup, using the environment variable
    /// names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(addr) = var("HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid {}HTTP_ADDR '{}': {}", ENV_PREFIX, addr, e)))?;
        }
        if let Some(dir) = var("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(kind) = var("STORAGE_TYPE") {
            self.storage.storage_type = kind.parse().map_err(Error::config)?;
        }
        if let Some(semantics) = var("PUT_SEMANTICS") {
            self.storage.put_semantics = semantics.parse().map_err(Error::config)?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.logging.format = format;
        }
        Ok(())
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::config(format!(
                "Invalid log level: {}. Valid options: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }
        let format = self.logging.format.to_ascii_lowercase();
        if !LOG_FORMATS.contains(&format.as_str()) {
            return Err(Error::config(format!(
                "Invalid log format: {}. Valid options: {}",
                self.logging.format,
                LOG_FORMATS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Cannot read {}: {}", path.display(), e)))?;
    let config: Config = toml::from_str(&config_str)
        .map_err(|e| Error::config(format!("Cannot parse {}: {}", path.display(), e)))?;
    Ok(config)
}

/// Load configuration from an explicit file, else `folio.toml` in the
/// working directory if present, else defaults. Environment overrides are
/// applied and the result validated.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let config = load_config(path)?;
            log_info!("Loaded configuration from: {}", path.display());
            config
        }
        None => {
            let implicit = Path::new(DEFAULT_CONFIG_FILE);
            if implicit.is_file() {
                let config = load_config(implicit)?;
                log_info!("Loaded configuration from: {}", implicit.display());
                config
            } else {
                log_debug!("No config file found, using defaults");
                Config::default()
            }
        }
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}
