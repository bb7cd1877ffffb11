//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SEARCH_TOOL_*)
//! 2. TOML config file (if SEARCH_TOOL_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Command-line flags are applied on top by the binary.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod search;
mod validation;

pub use search::{MAX_RESULTS, SafeSearch, SearchConfig, SearchEngine, TimeRange};
pub use validation::ConfigError;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_FILE_ENV: &str = "SEARCH_TOOL_CONFIG_FILE";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SEARCH_TOOL_";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SEARCH_TOOL_*)
/// 2. TOML config file (if SEARCH_TOOL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default search engine.
    ///
    /// Set via SEARCH_TOOL_ENGINE environment variable.
    #[serde(default)]
    pub engine: SearchEngine,

    /// Default number of results.
    ///
    /// Set via SEARCH_TOOL_NUM_RESULTS environment variable.
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub safe_search: SafeSearch,

    #[serde(default)]
    pub time_range: TimeRange,

    /// Browser User-Agent override. The browser's desktop Chrome UA is used when unset.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Proxy server for the browser.
    ///
    /// Set via SEARCH_TOOL_PROXY environment variable.
    #[serde(default)]
    pub proxy: Option<String>,

    /// Whether to run the browser without a window.
    ///
    /// Set via SEARCH_TOOL_HEADLESS environment variable.
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Page navigation timeout in milliseconds.
    ///
    /// Set via SEARCH_TOOL_NAVIGATION_TIMEOUT_MS environment variable.
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Pause after scrolling or clicking before reading the page, in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Explicit Chrome/Chromium executable. Auto-detected when unset.
    ///
    /// Set via SEARCH_TOOL_CHROME_EXECUTABLE environment variable.
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Persistent browser profile directory.
    #[serde(default = "default_user_data_dir")]
    pub user_data_dir: PathBuf,

    /// Whether search results are cached in SQLite.
    ///
    /// Set via SEARCH_TOOL_CACHE_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Path to SQLite cache database.
    ///
    /// Set via SEARCH_TOOL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn data_root() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".")).join("search-tool")
}

fn default_num_results() -> usize {
    10
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_settle_ms() -> u64 {
    1_500
}

fn default_user_data_dir() -> PathBuf {
    data_root().join("chrome-profile")
}

fn default_db_path() -> PathBuf {
    data_root().join("cache.sqlite")
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: SearchEngine::default(),
            num_results: default_num_results(),
            language: None,
            region: None,
            safe_search: SafeSearch::default(),
            time_range: TimeRange::default(),
            user_agent: None,
            proxy: None,
            headless: true,
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_ms: default_settle_ms(),
            chrome_executable: None,
            user_data_dir: default_user_data_dir(),
            cache_enabled: true,
            db_path: default_db_path(),
        }
    }
}

impl AppConfig {
    /// Navigation timeout as Duration for use with tokio.
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Settle delay as Duration.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SEARCH_TOOL_`
    /// 2. TOML file from `SEARCH_TOOL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var(CONFIG_FILE_ENV) {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Build the per-search configuration from the loaded defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the resulting search configuration is invalid.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        SearchConfig {
            search_engine: self.engine,
            num_results: self.num_results,
            language: self.language.clone(),
            region: self.region.clone(),
            safe_search: self.safe_search,
            time_range: self.time_range,
            user_agent: self.user_agent.clone(),
            proxy: self.proxy.clone(),
            headless: self.headless,
        }
        .normalized()
        .map_err(|e| ConfigError::Invalid { field: "num_results".into(), reason: e.to_string() })
    }
}
