//! # Configuration
//!
//! Settings come from three layers, later layers winning:
//! 1. `spycat.toml` (or the file given with `--config`)
//! 2. `SPYCAT_*` environment variables
//! 3. CLI flags
//!
//! ## Environment Variables
//!
//! - `SPYCAT_CAT_API_KEY`: API key sent to the breed service
//! - `SPYCAT_RATE_LIMIT`: Requests per second (0 disables)
//! - `SPYCAT_CORS_ORIGINS`: Comma-separated origins, or "*" for all
//! - `SPYCAT_ENFORCEMENT`: `compatible` or `strict`

use serde::{Deserialize, Serialize};
use spycat_core::Enforcement;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "spycat.toml";

/// Default breed list endpoint.
pub const DEFAULT_BREEDS_URL: &str = "https://api.thecatapi.com/v1/breeds";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub breeds: BreedsConfig,
    pub rules: RulesConfig,
}

/// `[server]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` allows localhost only; `["*"]` allows every origin.
    pub cors_origins: Option<Vec<String>>,
    /// Requests per second, 0 to disable.
    pub rate_limit: u32,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origins: None,
            rate_limit: 100,
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Redb,
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Invalid {
                key: "storage.backend".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: BackendKind,
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Redb,
            path: PathBuf::from("spycat.db"),
        }
    }
}

/// `[breeds]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreedsConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub cache_ttl_secs: u64,
    /// Offline breed list. When set, the remote service is never called.
    pub allow: Option<Vec<String>>,
}

impl Default for BreedsConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BREEDS_URL.to_string(),
            api_key: None,
            timeout_ms: 5000,
            cache_ttl_secs: 300,
            allow: None,
        }
    }
}

impl BreedsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// `[rules]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub enforcement: Enforcement,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load the file layer.
    ///
    /// An explicit path must exist. Without one, `spycat.toml` is read if
    /// present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply the `SPYCAT_*` environment layer.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(key) = lookup("SPYCAT_CAT_API_KEY").filter(|k| !k.is_empty()) {
            self.breeds.api_key = Some(key);
        }

        if let Some(raw) = lookup("SPYCAT_RATE_LIMIT") {
            self.server.rate_limit = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SPYCAT_RATE_LIMIT".to_string(),
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup("SPYCAT_CORS_ORIGINS") {
            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            self.server.cors_origins = Some(origins);
        }

        if let Some(raw) = lookup("SPYCAT_ENFORCEMENT") {
            self.rules.enforcement = raw.parse().map_err(|_| ConfigError::Invalid {
                key: "SPYCAT_ENFORCEMENT".to_string(),
                value: raw.clone(),
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
