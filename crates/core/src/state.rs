//! The record threaded through the four pipeline stages

use crate::error::{Error, Result};
use crate::services::RawHit;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One normalized web search hit
///
/// All three keys are always serialized; missing values become `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: Option<String>,
    pub snippet: Option<String>,
}

impl From<RawHit> for SearchHit {
    /// Accepts either `href`/`body` or `url`/`snippet` naming
    fn from(raw: RawHit) -> Self {
        Self {
            title: raw.title,
            url: raw.href.filter(|h| !h.is_empty()).or(raw.url),
            snippet: raw.body.filter(|b| !b.is_empty()).or(raw.snippet),
        }
    }
}

/// Search hits for one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPack {
    pub topic: String,
    pub results: Vec<SearchHit>,
}

/// Mutable state for a single run
///
/// Created with the input video and optional query, then extended once by each
/// stage in order. Stage fields stay `None` until their stage completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    pub video_path: PathBuf,
    pub user_query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<ResultPack>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<String>>,
}

impl PipelineState {
    /// Initial state; a blank query is treated as absent
    pub fn new(video_path: impl Into<PathBuf>, user_query: Option<String>) -> Self {
        Self {
            video_path: video_path.into(),
            user_query: user_query
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            summary: None,
            topics: None,
            search_results: None,
            questions: None,
        }
    }

    /// Project a completed run onto the caller-facing report
    pub fn report(&self) -> Result<RunReport> {
        let missing = |field: &str| {
            Error::precondition(format!("run report: '{field}' missing in state"))
        };
        Ok(RunReport {
            summary: self.summary.clone().ok_or_else(|| missing("summary"))?,
            topics: self.topics.clone().ok_or_else(|| missing("topics"))?,
            search_results: self
                .search_results
                .clone()
                .ok_or_else(|| missing("search_results"))?,
            questions: self.questions.clone().ok_or_else(|| missing("questions"))?,
        })
    }
}

/// Output exposed to whoever triggered the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: String,
    pub topics: Vec<String>,
    pub search_results: Vec<ResultPack>,
    pub questions: Vec<String>,
}
