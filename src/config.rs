use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use dinesure_core::{CollectionNames, RepositoryOptions};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_restaurants_collection() -> String {
    CollectionNames::default().restaurants
}

fn default_bookings_collection() -> String {
    CollectionNames::default().bookings
}

/// Remote document store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the document store (e.g., "https://store.example.com")
    pub url: Option<String>,
    /// API key sent as a bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_restaurants_collection")]
    pub restaurants_collection: String,
    #[serde(default = "default_bookings_collection")]
    pub bookings_collection: String,
    /// Upper bound for a single remote call; 0 waits indefinitely
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            restaurants_collection: default_restaurants_collection(),
            bookings_collection: default_bookings_collection(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            collections: CollectionNames {
                restaurants: self.restaurants_collection.clone(),
                bookings: self.bookings_collection.clone(),
            },
            remote_timeout: (self.timeout_secs > 0)
                .then(|| Duration::from_secs(self.timeout_secs)),
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding the local cache files
    pub data_dir: ConfigValue<PathBuf>,
    /// Never contact the remote store
    pub offline: ConfigValue<bool>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub remote: RemoteConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    offline: Option<bool>,
    remote: Option<RemoteConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut offline = ConfigValue::new(false, ConfigSource::Default);
        let mut config_file = None;
        let mut remote = RemoteConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(flag) = file_config.offline {
                offline = ConfigValue::new(flag, ConfigSource::File);
            }
            if let Some(remote_config) = file_config.remote {
                remote = remote_config;
            }
        }

        if let Ok(dir) = std::env::var("DINESURE_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(flag) = std::env::var("DINESURE_OFFLINE") {
            let flag = parse_bool(&flag).ok_or_else(|| ConfigError::InvalidEnv {
                name: "DINESURE_OFFLINE",
                value: flag.clone(),
            })?;
            offline = ConfigValue::new(flag, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("DINESURE_REMOTE_URL") {
            remote.url = Some(url);
        }
        if let Ok(key) = std::env::var("DINESURE_API_KEY") {
            remote.api_key = Some(key);
        }

        Ok(Self {
            data_dir,
            offline,
            config_file,
            remote,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/dinesure/
    /// - macOS: ~/Library/Application Support/dinesure/
    /// - Windows: %APPDATA%/dinesure/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dinesure")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/dinesure/
    /// - macOS: ~/Library/Application Support/dinesure/
    /// - Windows: %APPDATA%/dinesure/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dinesure")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    ParseError(PathBuf, serde_yaml::Error),
    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },
}
