//! Scripted service doubles shared by the pipeline integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};
use vidquest_core::error::{Error, Result};
use vidquest_core::{
    Config, InferenceService, MediaContainer, MediaHandle, MediaStatus, RawHit, SearchQuery,
    SearchService,
};

/// Inference double that replays scripted responses in call order
pub struct ScriptedInference {
    statuses: Mutex<VecDeque<MediaStatus>>,
    settled_status: MediaStatus,
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    uploads: AtomicUsize,
    status_polls: AtomicUsize,
}

impl ScriptedInference {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            settled_status: MediaStatus::Active,
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            uploads: AtomicUsize::new(0),
            status_polls: AtomicUsize::new(0),
        }
    }

    /// Model responses, consumed one per `generate` call
    pub fn with_responses(self, responses: &[&str]) -> Self {
        *self.responses.lock().unwrap() = responses.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Statuses reported before the settled status
    pub fn with_statuses(self, statuses: Vec<MediaStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    /// Status reported once the scripted statuses are used up
    pub fn settling_at(mut self, status: MediaStatus) -> Self {
        self.settled_status = status;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn status_polls(&self) -> usize {
        self.status_polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceService for ScriptedInference {
    async fn upload_media(&self, path: &Path, container: MediaContainer) -> Result<MediaHandle> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(MediaHandle {
            name: "files/scripted".to_string(),
            uri: format!("scripted://{}", path.display()),
            mime_type: container.mime_type().to_string(),
        })
    }

    async fn media_status(&self, _handle: &MediaHandle) -> Result<MediaStatus> {
        self.status_polls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.settled_status.clone()))
    }

    async fn generate(&self, prompt: &str, _media: Option<&MediaHandle>) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::inference("no scripted response left"))
    }
}

/// Search double returning canned hits per topic
#[derive(Default)]
pub struct ScriptedSearch {
    hits: HashMap<String, Vec<RawHit>>,
    failing_topic: Option<String>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl ScriptedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, topic: &str, hits: Vec<RawHit>) -> Self {
        self.hits.insert(topic.to_string(), hits);
        self
    }

    pub fn failing_on(mut self, topic: &str) -> Self {
        self.failing_topic = Some(topic.to_string());
        self
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchService for ScriptedSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawHit>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.failing_topic.as_deref() == Some(query.text.as_str()) {
            return Err(Error::search(format!("backend down for '{}'", query.text)));
        }
        Ok(self.hits.get(&query.text).cloned().unwrap_or_default())
    }
}

/// `count` hits titled "Hit 1".."Hit n" using the `href`/`body` naming
pub fn numbered_hits(count: usize) -> Vec<RawHit> {
    (1..=count)
        .map(|n| RawHit {
            title: Some(format!("Hit {n}")),
            href: Some(format!("https://example.org/{n}")),
            body: Some(format!("Snippet {n}")),
            ..Default::default()
        })
        .collect()
}

/// A small file with the given extension standing in for a video
pub fn video_file(extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{extension}"))
        .tempfile()
        .unwrap();
    file.write_all(b"\x00\x00\x00\x18ftypmp42").unwrap();
    file
}

/// Default configuration logging into a fresh temporary directory
pub fn test_config() -> (Config, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.logging.log_dir = dir.path().join("logs").to_string_lossy().into_owned();
    config.inference.poll_interval_ms = 10;
    config.inference.max_poll_interval_ms = 40;
    (config, dir)
}
