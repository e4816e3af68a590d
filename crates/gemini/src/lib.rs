//! Multimodal inference providers
//!
//! This crate implements [`vidquest_core::InferenceService`] on top of the
//! Gemini Files API and `generateContent` endpoint.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use std::sync::Arc;
use tracing::info;
use vidquest_core::config::InferenceConfig;
use vidquest_core::error::{Error, Result};
use vidquest_core::InferenceService;

pub mod error;
mod provider;

pub use error::GeminiError;
pub use provider::GeminiProvider;

/// Create an inference provider based on configuration
///
/// Fails with [`Error::MissingApiKey`] when neither `inference.api_key` nor
/// GOOGLE_API_KEY is set, so no model call is ever attempted without a key.
pub fn create_inference_provider(config: &InferenceConfig) -> Result<Arc<dyn InferenceService>> {
    match config.provider.as_str() {
        "gemini" => {
            let api_key = config.resolve_api_key().ok_or(Error::MissingApiKey)?;

            info!("Creating Gemini inference provider");
            let provider = GeminiProvider::new(
                api_key,
                config.model.clone(),
                config.api_base_url.clone(),
                config.timeout_secs,
                config.upload_timeout_secs,
            )?;

            Ok(Arc::new(provider))
        }
        other => Err(Error::config(format!(
            "Unknown inference provider: '{other}'. Valid providers: gemini"
        ))),
    }
}
