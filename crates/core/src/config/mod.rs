//! Client configuration with layered loading.
//!
//! Uses figment to merge configuration from multiple sources:
//!
//! 1. Environment variables (CONTEXTFORCE_*)
//! 2. TOML config file (if CONTEXTFORCE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::fmt;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::env::{CONFIG_FILE, CONFIG_PREFIX, CONTEXTFORCE_API_KEY, CONTEXTFORCE_USER_AGENT, resolve};

mod validation;

pub use validation::ConfigError;

/// Extraction endpoint. Target URLs are appended to it verbatim.
pub const DEFAULT_BASE_URL: &str = "https://r.contextforce.com/";

/// Search proxy endpoint. Search-engine URLs are appended to it verbatim.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://s.contextforce.com/";

/// Settings for an `ApiClient`.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CONTEXTFORCE_*)
/// 2. TOML config file (if CONTEXTFORCE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Bearer token sent in the `Authorization` header.
    ///
    /// Set via CONTEXTFORCE_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for extraction requests.
    ///
    /// Set via CONTEXTFORCE_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for search requests.
    ///
    /// Set via CONTEXTFORCE_SEARCH_BASE_URL environment variable.
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// Request timeout in milliseconds. No timeout when unset.
    ///
    /// Set via CONTEXTFORCE_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via CONTEXTFORCE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.into()
}

fn default_user_agent() -> String {
    concat!("contextforce-rs/", env!("CARGO_PKG_VERSION")).into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            search_base_url: default_search_base_url(),
            timeout_ms: None,
            user_agent: default_user_agent(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("search_base_url", &self.search_base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Default configuration carrying the given API key.
    pub fn with_api_key(api_key: Option<String>) -> Self {
        Self { api_key, ..Default::default() }
    }

    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CONTEXTFORCE_`
    /// 2. TOML file from `CONTEXTFORCE_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var(CONFIG_FILE) {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed(CONFIG_PREFIX)
                .ignore(&["config_file", "api_key", "user_agent"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let mut config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        // Free-form strings are read raw; the env provider would coerce "123" or "true".
        let file_key = config.api_key.take().filter(|key| !key.is_empty());
        config.api_key = resolve(None, CONTEXTFORCE_API_KEY).or(file_key);
        if let Some(user_agent) = resolve(None, CONTEXTFORCE_USER_AGENT) {
            config.user_agent = user_agent;
        }

        config.validate()?;

        Ok(config)
    }
}
