//! Error types for the search providers

use std::fmt;

/// Errors that can occur during web search
#[derive(Debug)]
pub enum SearchError {
    /// Request failed or the backend answered with an error status
    RequestError(String),

    /// The backend is throttling this client
    RateLimited(String),

    /// Result page could not be parsed
    ParseError(String),

    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestError(msg) => write!(f, "Search request failed: {msg}"),
            Self::RateLimited(msg) => write!(f, "Search rate limited: {msg}"),
            Self::ParseError(msg) => write!(f, "Failed to parse search results: {msg}"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<SearchError> for vidquest_core::error::Error {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::ConfigError(msg) => vidquest_core::error::Error::Config(msg),
            other => vidquest_core::error::Error::Search(other.to_string()),
        }
    }
}
