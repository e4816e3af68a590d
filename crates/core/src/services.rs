//! Interfaces to the external model and search services
//!
//! Implementations live in the provider crates; the pipeline only depends on
//! these traits.

use crate::config::SafeSearch;
use crate::error::Result;
use crate::media::MediaContainer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Handle to media uploaded to the inference service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHandle {
    /// Service-side resource name used for status polling
    pub name: String,
    /// URI referenced from inference requests
    pub uri: String,
    pub mime_type: String,
}

/// Processing state reported for uploaded media
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaStatus {
    Processing,
    Active,
    Failed(Option<String>),
}

/// Multimodal inference service: upload media, poll until ready, infer
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Upload a local media file and return its handle
    async fn upload_media(&self, path: &Path, container: MediaContainer) -> Result<MediaHandle>;

    /// Current processing state of uploaded media
    async fn media_status(&self, handle: &MediaHandle) -> Result<MediaStatus>;

    /// Run one inference call with an optional media attachment
    async fn generate(&self, prompt: &str, media: Option<&MediaHandle>) -> Result<String>;
}

/// One search query as sent to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub max_results: usize,
    pub safe_search: SafeSearch,
    pub region: Option<String>,
}

/// A hit as returned by a backend
///
/// Backends name the link either `href` or `url` and the text either `body`
/// or `snippet`; see [`crate::state::SearchHit`] for normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Web search service
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Ordered hits for the query, best first
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>>;
}
