//! Configuration module for vidquest
//!
//! Configuration is loaded in layers: built-in defaults, a TOML file, then
//! environment variables. See [`Config::load`].

mod defaults;
mod loading;


use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use defaults::*;

/// Upper bound for `search.max_results`
const MAX_SEARCH_RESULTS: usize = 25;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.vidquest/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".vidquest").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Multimodal inference service configuration
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Web search configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Run log configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// HTTP upload server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Configuration for the multimodal inference service
///
/// # Providers
/// - `gemini` (default): Google Gemini API, uses GOOGLE_API_KEY env var
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Provider type: "gemini"
    #[serde(default = "default_inference_provider")]
    pub provider: String,

    /// Model name used for every inference call
    #[serde(default = "default_inference_model")]
    pub model: String,

    /// API key (or use GOOGLE_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the inference API
    #[serde(default = "default_inference_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_inference_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout in seconds for the media upload request, which streams the
    /// whole file and so gets its own bound
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,

    /// First delay between media readiness polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Ceiling for the exponential poll backoff
    #[serde(default = "default_max_poll_interval_ms")]
    pub max_poll_interval_ms: u64,

    /// Total time allowed for uploaded media to become ready
    #[serde(default = "default_media_ready_timeout_secs")]
    pub media_ready_timeout_secs: u64,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_interval_ms", &self.max_poll_interval_ms)
            .field("media_ready_timeout_secs", &self.media_ready_timeout_secs)
            .finish()
    }
}

impl InferenceConfig {
    /// Configured key, falling back to the GOOGLE_API_KEY environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Polling schedule for media readiness
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_interval: Duration::from_millis(self.poll_interval_ms),
            max_interval: Duration::from_millis(self.max_poll_interval_ms),
            max_wait: Duration::from_secs(self.media_ready_timeout_secs),
        }
    }
}

/// Bounded exponential polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub max_wait: Duration,
}

impl PollPolicy {
    /// Delay to use after `current`, doubling up to the ceiling
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max_interval)
    }
}

/// Safe-search level requested from the search backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SafeSearch {
    Strict,
    #[default]
    Moderate,
    Off,
}

impl SafeSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Moderate => "moderate",
            Self::Off => "off",
        }
    }
}

/// Configuration for web search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Provider type: "duckduckgo"
    #[serde(default = "default_search_provider")]
    pub provider: String,

    /// Hits requested per topic
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Safe-search filtering level
    #[serde(default)]
    pub safe_search: SafeSearch,

    /// Optional region code (e.g. "us-en")
    #[serde(default)]
    pub region: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent to the search backend
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Configuration for the run logger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory holding the event log and run snapshots
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// File name of the append-only event log inside `log_dir`
    #[serde(default = "default_event_log_file")]
    pub event_log_file: String,
}

/// Configuration for the HTTP upload server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on (host is always 127.0.0.1)
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Maximum accepted upload size in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

// Default implementations

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: default_inference_provider(),
            model: default_inference_model(),
            api_key: None,
            api_base_url: default_inference_api_base_url(),
            timeout_secs: default_inference_timeout_secs(),
            upload_timeout_secs: default_upload_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_poll_interval_ms: default_max_poll_interval_ms(),
            media_ready_timeout_secs: default_media_ready_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            max_results: default_max_results(),
            safe_search: SafeSearch::default(),
            region: None,
            timeout_secs: default_search_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            event_log_file: default_event_log_file(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let inference = &self.inference;
        if inference.provider.trim().is_empty() {
            return Err(Error::config("inference.provider must not be empty"));
        }
        if inference.model.trim().is_empty() {
            return Err(Error::config("inference.model must not be empty"));
        }
        if inference.timeout_secs == 0 {
            return Err(Error::config(
                "inference.timeout_secs must be greater than 0",
            ));
        }
        if inference.upload_timeout_secs == 0 {
            return Err(Error::config(
                "inference.upload_timeout_secs must be greater than 0",
            ));
        }
        if inference.poll_interval_ms == 0 {
            return Err(Error::config(
                "inference.poll_interval_ms must be greater than 0",
            ));
        }
        if inference.max_poll_interval_ms < inference.poll_interval_ms {
            return Err(Error::config(format!(
                "inference.max_poll_interval_ms ({}) must be >= poll_interval_ms ({})",
                inference.max_poll_interval_ms, inference.poll_interval_ms
            )));
        }
        if inference.media_ready_timeout_secs == 0 {
            return Err(Error::config(
                "inference.media_ready_timeout_secs must be greater than 0",
            ));
        }

        if self.search.provider.trim().is_empty() {
            return Err(Error::config("search.provider must not be empty"));
        }
        if self.search.max_results == 0 {
            return Err(Error::config("search.max_results must be greater than 0"));
        }
        if self.search.max_results > MAX_SEARCH_RESULTS {
            return Err(Error::config(format!(
                "search.max_results too large (max {MAX_SEARCH_RESULTS}, got {})",
                self.search.max_results
            )));
        }
        if self.search.timeout_secs == 0 {
            return Err(Error::config("search.timeout_secs must be greater than 0"));
        }

        if self.logging.event_log_file.trim().is_empty() {
            return Err(Error::config("logging.event_log_file must not be empty"));
        }

        if self.server.max_upload_mb == 0 {
            return Err(Error::config("server.max_upload_mb must be greater than 0"));
        }

        Ok(())
    }
}
