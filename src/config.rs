//! Configuration file support for TRADELUX.
//!
//! Settings are read from a JSON file (an explicit path, or the platform
//! config directory), then selected values are overridden from the
//! environment. A `.env` file is loaded into the environment first. The API
//! key only ever comes from the environment and is never written back out.

use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use tradelux_viewer::ViewerConfig;

use crate::constants::{
    AIRTABLE_API_URL, ALLOWED_IMAGE_HOSTS, DEFAULT_HOST, DEFAULT_PORT, VEHICLES_TABLE,
    VEHICLE_IMAGES_TABLE,
};
use crate::model::ImageHostPolicy;

/// Format version written by this build. Files with a higher version are
/// refused; a file without one is taken as this version.
pub const CONFIG_VERSION: u32 = 1;

/// Environment variables that override file settings.
pub mod env {
    pub const API_KEY: &str = "AIRTABLE_API_KEY";
    pub const BASE_ID: &str = "AIRTABLE_BASE_ID";
    pub const HOST: &str = "TRADELUX_HOST";
    pub const PORT: &str = "TRADELUX_PORT";
}

/// Server and viewer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Name used in startup logging
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Default filter when `RUST_LOG` is unset: "off", "error" .. "trace"
    #[serde(default = "default_log_level")]
    pub log_level: LevelFilter,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub record_store: RecordStoreConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_app_name() -> String {
    "TRADELUX".to_string()
}

fn default_log_level() -> LevelFilter {
    LevelFilter::Info
}

/// HTTP server section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Hosts that photo URLs may point at
    #[serde(default = "default_allowed_image_hosts")]
    pub allowed_image_hosts: Vec<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_allowed_image_hosts() -> Vec<String> {
    ALLOWED_IMAGE_HOSTS.iter().map(|host| host.to_string()).collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_image_hosts: default_allowed_image_hosts(),
        }
    }
}

impl ServerConfig {
    pub fn image_host_policy(&self) -> ImageHostPolicy {
        ImageHostPolicy::new(self.allowed_image_hosts.iter().cloned())
    }

    /// `host:port`, for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Record store section of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordStoreConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub base_id: String,

    /// Set from the environment only
    #[serde(skip)]
    pub api_key: Option<String>,

    #[serde(default = "default_vehicles_table")]
    pub vehicles_table: String,

    #[serde(default = "default_images_table")]
    pub images_table: String,
}

fn default_api_url() -> String {
    AIRTABLE_API_URL.to_string()
}

fn default_vehicles_table() -> String {
    VEHICLES_TABLE.to_string()
}

fn default_images_table() -> String {
    VEHICLE_IMAGES_TABLE.to_string()
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            base_id: String::new(),
            api_key: None,
            vehicles_table: default_vehicles_table(),
            images_table: default_images_table(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            record_store: RecordStoreConfig::default(),
            viewer: ViewerConfig::default(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a config file body, refusing formats newer than this build.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    pub fn default_filename() -> &'static str {
        "tradelux-config.json"
    }

    /// `<config dir>/tradelux/tradelux-config.json`, with `~/.config` standing
    /// in when the platform has no config dir.
    pub fn default_path() -> Option<PathBuf> {
        let dir = dirs::config_dir().or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(dir.join("tradelux").join(Self::default_filename()))
    }

    /// Read a config file. Unlike the default path, an explicit path must exist.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// The default file, if there is one and it parses. Failures are logged.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Full startup load: file (explicit or default), `.env`, then the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_from_default_path().unwrap_or_default(),
        };
        if let Ok(dotenv) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {:?}", dotenv);
        }
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Override settings from environment variables, looked up through
    /// `lookup`. Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(env::API_KEY) {
            self.record_store.api_key = Some(key);
        }
        if let Some(base_id) = get(env::BASE_ID) {
            self.record_store.base_id = base_id;
        }
        if let Some(host) = get(env::HOST) {
            self.server.host = host;
        }
        if let Some(port) = get(env::PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidSetting {
                name: env::PORT.to_string(),
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    /// Check that the record store can be reached with these settings.
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.record_store.api_key.as_deref().is_none_or(|key| key.trim().is_empty()) {
            return Err(ConfigError::MissingSetting(env::API_KEY.to_string()));
        }
        if self.record_store.base_id.trim().is_empty() {
            return Err(ConfigError::MissingSetting(env::BASE_ID.to_string()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A required setting has no value
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    /// A setting has a value that cannot be used
    #[error("Invalid value {value:?} for {name}")]
    InvalidSetting { name: String, value: String },
}
