//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Flickr REST endpoint used when no `base_url` is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.flickr.com/services/rest/";

/// Quiet period before a typed query is evaluated.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PHOTOSEARCH_CONFIG";

/// Environment variable carrying the Flickr API key.
pub const API_KEY_ENV: &str = "PHOTOSEARCH_API_KEY";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// Config file parsed but a value is out of range.
    #[error("Invalid value for {field} in {path}: {reason}")]
    InvalidValue {
        /// Path of the offending file.
        path: PathBuf,
        /// Name of the offending key.
        field: &'static str,
        /// What the value must satisfy.
        reason: String,
    },

    /// No API key in the config file, `PHOTOSEARCH_API_KEY`, or `--api-key`.
    #[error("No Flickr API key configured (set api_key, PHOTOSEARCH_API_KEY, or --api-key)")]
    MissingApiKey,
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/photosearch/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Flickr API key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// REST endpoint (override for proxies and tests).
    #[serde(default)]
    pub base_url: Option<String>,

    /// Results requested per page.
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Debounce quiet period in milliseconds.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Per-request HTTP timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Flickr API key, if any source provided one.
    pub api_key: Option<String>,
    /// REST endpoint.
    pub base_url: String,
    /// Results per page.
    pub per_page: u32,
    /// Debounce quiet period in milliseconds.
    pub debounce_ms: u64,
    /// Optional HTTP timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: crate::model::DEFAULT_PER_PAGE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_secs: None,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Debounce period as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// HTTP timeout as a `Duration`, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// The API key, or `ConfigError::MissingApiKey`.
    ///
    /// Blank keys count as missing.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/photosearch/photosearch.log` on Linux,
/// or the platform state/data directory elsewhere.
///
/// If no such directory can be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir().or_else(dirs::data_local_dir) {
        state_dir.join("photosearch").join("photosearch.log")
    } else {
        PathBuf::from("photosearch.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
/// Returns `Err` if file exists but cannot be read or parsed.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors, or holds an
/// out-of-range value such as `per_page = 0`.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    config.validate(&path)?;
    Ok(Some(config))
}

impl ConfigFile {
    /// Reject values the search source cannot be asked for.
    fn validate(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if self.per_page == Some(0) {
            return Err(ConfigError::InvalidValue {
                path: path.to_path_buf(),
                field: "per_page",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/photosearch/config.toml` on Linux, appropriate path on other platforms.
/// Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("photosearch").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `PHOTOSEARCH_CONFIG` environment variable
/// 3. Default path `~/.config/photosearch/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        api_key: config.api_key.or(defaults.api_key),
        base_url: config.base_url.unwrap_or(defaults.base_url),
        per_page: config.per_page.unwrap_or(defaults.per_page),
        debounce_ms: config.debounce_ms.unwrap_or(defaults.debounce_ms),
        request_timeout_secs: config
            .request_timeout_secs
            .or(defaults.request_timeout_secs),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `PHOTOSEARCH_API_KEY`: Override API key
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(api_key) = std::env::var(API_KEY_ENV) {
        config.api_key = Some(api_key);
    }

    config
}

/// CLI flags that override configuration. `None` means "flag not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// `--api-key`
    pub api_key: Option<String>,
    /// `--per-page`
    pub per_page: Option<u32>,
    /// `--debounce-ms`
    pub debounce_ms: Option<u64>,
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(api_key) = cli.api_key {
        config.api_key = Some(api_key);
    }

    if let Some(per_page) = cli.per_page {
        config.per_page = per_page;
    }

    if let Some(debounce_ms) = cli.debounce_ms {
        config.debounce_ms = debounce_ms;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
