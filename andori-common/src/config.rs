//! Client configuration
//!
//! Values resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Versioned API prefix appended to the base URL
pub const API_PREFIX: &str = "/api/v1";

pub const API_BASE_URL_ENV: &str = "ANDORI_API_BASE_URL";
/// Deployment-wide variable, checked after `ANDORI_API_BASE_URL`
pub const API_BASE_URL_FALLBACK_ENV: &str = "API_BASE_URL";
pub const CONFIG_PATH_ENV: &str = "ANDORI_CONFIG";

/// `[logging]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TomlConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub legacy_store_dir: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without trailing slash
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub legacy_store_dir: PathBuf,
    pub log_level: String,
}

impl ClientConfig {
    /// Resolve all settings from CLI arguments, environment and config file
    pub fn load(cli_base_url: Option<&str>, cli_config_path: Option<&Path>) -> Self {
        let toml = match resolve_config_path(cli_config_path) {
            Some(path) => match load_toml_config(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config file");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring config file");
                    TomlConfig::default()
                }
            },
            None => TomlConfig::default(),
        };
        Self::from_sources(cli_base_url, &toml)
    }

    /// Combine an already parsed config file with CLI and environment
    pub fn from_sources(cli_base_url: Option<&str>, toml: &TomlConfig) -> Self {
        Self {
            api_base_url: resolve_api_base_url(cli_base_url, toml.api_base_url.as_deref()),
            request_timeout: Duration::from_secs(
                toml.request_timeout_secs
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            legacy_store_dir: toml
                .legacy_store_dir
                .clone()
                .unwrap_or_else(default_legacy_store_dir),
            log_level: toml.logging.level.clone(),
        }
    }

    /// Defaults with an explicit backend origin
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: normalize_base_url(base_url),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            legacy_store_dir: default_legacy_store_dir(),
            log_level: default_log_level(),
        }
    }

    /// `{base}/api/v1`
    pub fn api_root(&self) -> String {
        format!("{}{}", self.api_base_url, API_PREFIX)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strip trailing slashes; blank input falls back to the default origin
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Backend origin: CLI, `ANDORI_API_BASE_URL`, `API_BASE_URL`, config file, default
pub fn resolve_api_base_url(cli_arg: Option<&str>, toml_value: Option<&str>) -> String {
    let resolved = non_blank(cli_arg.map(str::to_string))
        .or_else(|| non_blank(std::env::var(API_BASE_URL_ENV).ok()))
        .or_else(|| non_blank(std::env::var(API_BASE_URL_FALLBACK_ENV).ok()))
        .or_else(|| non_blank(toml_value.map(str::to_string)))
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    normalize_base_url(&resolved)
}

/// Config file location: CLI, `ANDORI_CONFIG`, then the platform default if it exists
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }
    if let Some(path) = non_blank(std::env::var(CONFIG_PATH_ENV).ok()) {
        return Some(PathBuf::from(path));
    }
    default_config_path().filter(|p| p.exists())
}

/// `<config_dir>/andori/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("andori").join("config.toml"))
}

/// `<data_local_dir>/andori/legacy`
pub fn default_legacy_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("andori").join("legacy"))
        .unwrap_or_else(|| PathBuf::from("./andori_data/legacy"))
}

pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}
