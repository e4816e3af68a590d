//! Error types for the Gemini provider

use std::fmt;

/// Errors that can occur while talking to the Gemini API
#[derive(Debug)]
pub enum GeminiError {
    /// Media upload failed
    UploadError(String),

    /// Inference request failed
    InferenceError(String),

    /// Response did not have the expected shape
    ResponseError(String),

    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for GeminiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadError(msg) => write!(f, "Media upload failed: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference failed: {msg}"),
            Self::ResponseError(msg) => write!(f, "Unexpected Gemini response: {msg}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for GeminiError {}

impl From<GeminiError> for vidquest_core::error::Error {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::ConfigError(msg) => vidquest_core::error::Error::Config(msg),
            other => vidquest_core::error::Error::Inference(other.to_string()),
        }
    }
}
