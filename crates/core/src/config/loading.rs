//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, Environment, File};
use std::path::Path;
use tracing::debug;

use super::{global_config_path, Config};

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `VIDQUEST_` and use double underscores
    /// for nested values. For example:
    /// - `VIDQUEST_INFERENCE__MODEL=gemini-1.5-flash`
    /// - `VIDQUEST_SEARCH__MAX_RESULTS=8`
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut builder = ConfigLib::builder();

        if path.exists() {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        } else {
            debug!("No config file at {}, using defaults", path.display());
        }

        builder = builder.add_source(
            Environment::with_prefix("VIDQUEST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.vidquest/config.toml or custom --config path)
    /// 3. Environment variables (VIDQUEST_*)
    ///
    /// The inference credential additionally falls back to GOOGLE_API_KEY at
    /// provider construction, see [`super::InferenceConfig::resolve_api_key`].
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
