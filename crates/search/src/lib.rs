//! Web search providers
//!
//! This crate implements [`vidquest_core::SearchService`] on top of the
//! DuckDuckGo HTML endpoint.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::sync::Arc;
use tracing::info;
use vidquest_core::config::SearchConfig;
use vidquest_core::error::{Error, Result};
use vidquest_core::SearchService;

mod duckduckgo;
pub mod error;

pub use duckduckgo::DuckDuckGoProvider;
pub use error::SearchError;

/// Create a search provider based on configuration
pub fn create_search_provider(config: &SearchConfig) -> Result<Arc<dyn SearchService>> {
    match config.provider.as_str() {
        "duckduckgo" => {
            info!("Creating DuckDuckGo search provider");
            let provider = DuckDuckGoProvider::new(&config.user_agent, config.timeout_secs)?;
            Ok(Arc::new(provider))
        }
        other => Err(Error::config(format!(
            "Unknown search provider: '{other}'. Valid providers: duckduckgo"
        ))),
    }
}
