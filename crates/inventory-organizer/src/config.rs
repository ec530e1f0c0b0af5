//! Application configuration.
//!
//! Two sources are supported: a TOML file read with [`load_config`], or `INVENTORY_*`
//! environment variables (after loading `.env`) read with [`AppConfig::from_env`].
//!
//! ```toml
//! [project]
//! api_key = "local-key"
//! auth_domain = "inventory.local"
//! project_id = "inventory-local"
//! storage_bucket = "inventory-local.bucket"
//! messaging_sender_id = "0"
//! app_id = "1:0:local"
//!
//! [inventory]
//! collection = "inventory"
//! update_mode = "atomic"        # or "read_modify_write"
//! channel_capacity = 32
//! ```

use crate::inventory::UpdateMode;
use serde::Deserialize;
use std::{fs, path::Path};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML from config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Configuration field {0} must not be empty")]
    Empty(&'static str),
}

/// Identity of the hosted project the services belong to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    #[serde(default)]
    pub measurement_id: Option<String>,
}

impl ProjectConfig {
    /// Rejects a bundle that could not address a project.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("api_key", &self.api_key),
            ("project_id", &self.project_id),
            ("app_id", &self.app_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(name));
            }
        }
        Ok(())
    }
}

/// Tuning for the inventory collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    pub collection: String,
    pub update_mode: UpdateMode,
    pub channel_capacity: usize,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            collection: "inventory".to_string(),
            update_mode: UpdateMode::Atomic,
            channel_capacity: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub project: ProjectConfig,
    #[serde(default)]
    pub inventory: InventorySettings,
}

impl AppConfig {
    /// A self-contained configuration for running everything in one process.
    pub fn local() -> Self {
        Self {
            project: ProjectConfig {
                api_key: "local-key".to_string(),
                auth_domain: "inventory.local".to_string(),
                project_id: "inventory-local".to_string(),
                storage_bucket: "inventory-local.bucket".to_string(),
                messaging_sender_id: "0".to_string(),
                app_id: "1:0:local".to_string(),
                measurement_id: None,
            },
            inventory: InventorySettings::default(),
        }
    }

    /// Reads the configuration from `INVENTORY_*` variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded .env file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    ///
    /// Project fields are required except `INVENTORY_MEASUREMENT_ID`. Inventory settings
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::MissingVar(name));

        let project = ProjectConfig {
            api_key: required("INVENTORY_API_KEY")?,
            auth_domain: required("INVENTORY_AUTH_DOMAIN")?,
            project_id: required("INVENTORY_PROJECT_ID")?,
            storage_bucket: required("INVENTORY_STORAGE_BUCKET")?,
            messaging_sender_id: required("INVENTORY_MESSAGING_SENDER_ID")?,
            app_id: required("INVENTORY_APP_ID")?,
            measurement_id: lookup("INVENTORY_MEASUREMENT_ID"),
        };

        let mut inventory = InventorySettings::default();
        if let Some(collection) = lookup("INVENTORY_COLLECTION") {
            inventory.collection = collection;
        }
        if let Some(value) = lookup("INVENTORY_UPDATE_MODE") {
            inventory.update_mode = match value.as_str() {
                "atomic" => UpdateMode::Atomic,
                "read_modify_write" => UpdateMode::ReadModifyWrite,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "INVENTORY_UPDATE_MODE",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("INVENTORY_CHANNEL_CAPACITY") {
            inventory.channel_capacity =
                value.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "INVENTORY_CHANNEL_CAPACITY",
                    value,
                })?;
        }

        let config = Self { project, inventory };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.project.validate()?;
        if self.inventory.collection.trim().is_empty() {
            return Err(ConfigError::Empty("inventory.collection"));
        }
        if self.inventory.channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                name: "inventory.channel_capacity",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Reads and validates a TOML configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
        path: path_ref.display().to_string(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path_ref.display().to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
