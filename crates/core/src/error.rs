use std::time::Duration;
use thiserror::Error;

/// Result type for vidquest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vidquest operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No credential available for the inference service
    #[error("API key not configured")]
    MissingApiKey,

    /// Invalid input supplied by the caller (e.g. unsupported container)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stage ran without the state fields it requires
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Upload or inference call to the multimodal model failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// The model service reported that the uploaded media could not be processed
    #[error("Media processing failed for {name}: {reason}")]
    MediaProcessing { name: String, reason: String },

    /// The model returned nothing usable where output is mandatory
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// Web search backend failure
    #[error("Search error: {0}")]
    Search(String),

    /// A bounded wait ran out of time
    #[error("Timed out after {elapsed:?} waiting for {what}")]
    Timeout { what: String, elapsed: Duration },

    /// The run was cancelled by its owner
    #[error("Run cancelled")]
    Cancelled,

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates a precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Creates an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Creates a search error
    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }

    /// Creates a timeout error
    pub fn timeout(what: impl Into<String>, elapsed: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            elapsed,
        }
    }

    /// Adds context to any error
    pub fn with_context<E>(context: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error came from caller input rather than a backend
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::with_context(context, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_message() {
        let err = Error::precondition("web search: 'topics' missing or empty in state");
        assert_eq!(
            err.to_string(),
            "Precondition failed: web search: 'topics' missing or empty in state"
        );
    }

    #[test]
    fn test_context_wraps_source() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = io.context("Failed to read video").unwrap_err();
        assert_eq!(err.to_string(), "Failed to read video: no such file");
    }

    #[test]
    fn test_only_invalid_input_is_client_error() {
        assert!(Error::invalid_input("bad").is_client_error());
        assert!(!Error::Cancelled.is_client_error());
        assert!(!Error::search("down").is_client_error());
    }
}
