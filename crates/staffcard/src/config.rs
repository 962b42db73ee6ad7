//! Configuration management for staffcard.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::BIO_DISPLAY_LIMIT;
use crate::seed::FakerSeedSource;
use crate::store::DEFAULT_STORAGE_KEY;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "staffcard";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "directory.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `STAFFCARD_`)
/// 2. TOML config file at `~/.config/staffcard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Seed source configuration.
    pub seed: SeedConfig,
    /// Business card rendering configuration.
    pub card: CardConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/staffcard/directory.db`
    pub database_path: Option<PathBuf>,
    /// Key the employee collection is stored under.
    pub key: String,
}

/// Seed-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed the directory from the remote source when it is empty.
    pub enabled: bool,
    /// Person generator endpoint.
    pub endpoint: String,
    /// Number of records to request.
    pub quantity: usize,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Card-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Organization printed on every vCard.
    pub organization: String,
    /// Public URL of the app; profile links are `<base>#/profile/<id>`.
    pub public_base_url: String,
    /// Character limit shown for biographies.
    pub bio_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: FakerSeedSource::DEFAULT_ENDPOINT.to_string(),
            quantity: 20,
            timeout_ms: 5_000,
        }
    }
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            organization: "Electric Filament".to_string(),
            public_base_url: "http://localhost:5173/".to_string(),
            bio_limit: BIO_DISPLAY_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("STAFFCARD_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "storage.key must not be empty".to_string(),
            });
        }

        if self.seed.timeout_ms == 0 {
            return Err(Error::ConfigValidation {
                message: "seed.timeout_ms must be greater than 0".to_string(),
            });
        }

        if !(self.seed.endpoint.starts_with("http://") || self.seed.endpoint.starts_with("https://"))
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "seed.endpoint must be an http(s) URL: {}",
                    self.seed.endpoint
                ),
            });
        }

        if self.card.public_base_url.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "card.public_base_url must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the seed request timeout as a Duration.
    #[must_use]
    pub fn seed_timeout(&self) -> Duration {
        Duration::from_millis(self.seed.timeout_ms)
    }
}
