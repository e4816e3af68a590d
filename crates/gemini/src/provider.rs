//! Gemini multimodal provider (Files API + generateContent)

use crate::error::GeminiError;
use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};
use vidquest_core::error::Result;
use vidquest_core::{InferenceService, MediaContainer, MediaHandle, MediaStatus};

const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Body of the resumable upload start request
#[derive(Debug, Serialize)]
struct StartUploadRequest<'a> {
    file: UploadMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct UploadMetadata<'a> {
    display_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: FileResource,
}

/// File resource as reported by the Files API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResource {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<FileError>,
}

#[derive(Debug, Deserialize)]
struct FileError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    FileData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        #[serde(rename = "fileUri")]
        file_uri: &'a str,
    },
    Text(&'a str),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

/// Gemini provider for upload, status polling and inference
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
    upload_timeout: Duration,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    /// * `api_key` - Google AI API key
    /// * `model` - Model name (e.g., "gemini-2.0-flash-exp")
    /// * `api_base_url` - API root, normally "https://generativelanguage.googleapis.com"
    /// * `timeout_secs` - Request timeout in seconds
    /// * `upload_timeout_secs` - Timeout for the request carrying the media bytes
    pub fn new(
        api_key: String,
        model: String,
        api_base_url: String,
        timeout_secs: u64,
        upload_timeout_secs: u64,
    ) -> Result<Self> {
        info!("Initializing Gemini provider");
        info!("  Model: {model}");
        info!("  API Base URL: {api_base_url}");
        info!("  Timeout: {timeout_secs}s (upload {upload_timeout_secs}s)");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GeminiError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            upload_timeout: Duration::from_secs(upload_timeout_secs),
        })
    }

    /// Request sending the file contents to a resumable upload session
    ///
    /// The body is streamed from disk and the request is bounded by the upload
    /// timeout rather than the client-wide one.
    fn finalize_upload_request(&self, upload_url: &str, file: File, len: u64) -> RequestBuilder {
        self.client
            .post(upload_url)
            .timeout(self.upload_timeout)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header(CONTENT_LENGTH, len)
            .body(Body::wrap_stream(ReaderStream::new(file)))
    }

    fn files_upload_url(&self) -> String {
        format!("{}/upload/v1beta/files", self.api_base_url)
    }

    fn resource_url(&self, name: &str) -> String {
        format!("{}/v1beta/{name}", self.api_base_url)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url, self.model
        )
    }
}

/// Describe a transport error without its URL, which carries the API key
fn describe_request_error(e: reqwest::Error) -> String {
    let kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connection"
    } else if e.is_request() {
        "request build"
    } else if e.is_body() {
        "body"
    } else {
        "unknown"
    };
    format!("{kind}: {}", e.without_url())
}

/// Turn a non-success response into an error message
async fn error_for_status(response: Response, what: &str) -> std::result::Result<Response, String> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    Err(format!("{what} returned error {status}: {error_text}"))
}

fn media_status_from_file(file: &FileResource) -> MediaStatus {
    match file.state.as_deref() {
        Some("ACTIVE") => MediaStatus::Active,
        Some("FAILED") => MediaStatus::Failed(file.error.as_ref().and_then(|e| e.message.clone())),
        // STATE_UNSPECIFIED, PROCESSING or missing
        _ => MediaStatus::Processing,
    }
}

/// Concatenate the text parts of the first candidate
fn response_text(response: GenerateResponse) -> std::result::Result<String, GeminiError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(GeminiError::InferenceError(format!(
            "prompt blocked: {reason}"
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::ResponseError("no candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason {
            debug!("Gemini candidate finished without text: {reason}");
        }
    }
    Ok(text)
}

#[async_trait]
impl InferenceService for GeminiProvider {
    async fn upload_media(&self, path: &Path, container: MediaContainer) -> Result<MediaHandle> {
        let file = File::open(path).await?;
        let len = file.metadata().await?.len();
        let display_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video");

        info!(
            "Uploading {} ({} KB, {})",
            display_name,
            len / 1024,
            container.mime_type()
        );

        let start = self
            .client
            .post(self.files_upload_url())
            .query(&[("key", self.api_key.as_str())])
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", len.to_string())
            .header("X-Goog-Upload-Header-Content-Type", container.mime_type())
            .json(&StartUploadRequest {
                file: UploadMetadata { display_name },
            })
            .send()
            .await
            .map_err(|e| GeminiError::UploadError(describe_request_error(e)))?;
        let start = error_for_status(start, "Upload start")
            .await
            .map_err(GeminiError::UploadError)?;

        let upload_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                GeminiError::UploadError(format!("response missing {UPLOAD_URL_HEADER} header"))
            })?;

        let finalize = self
            .finalize_upload_request(&upload_url, file, len)
            .send()
            .await
            .map_err(|e| GeminiError::UploadError(describe_request_error(e)))?;
        let finalize = error_for_status(finalize, "Upload finalize")
            .await
            .map_err(GeminiError::UploadError)?;

        let uploaded: UploadResponse = finalize.json().await.map_err(|e| {
            GeminiError::ResponseError(format!("Failed to parse upload response: {e}"))
        })?;

        debug!(
            "Uploaded {} as {} (state {:?})",
            display_name, uploaded.file.name, uploaded.file.state
        );

        Ok(MediaHandle {
            mime_type: uploaded
                .file
                .mime_type
                .unwrap_or_else(|| container.mime_type().to_string()),
            name: uploaded.file.name,
            uri: uploaded.file.uri,
        })
    }

    async fn media_status(&self, handle: &MediaHandle) -> Result<MediaStatus> {
        let response = self
            .client
            .get(self.resource_url(&handle.name))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| GeminiError::InferenceError(describe_request_error(e)))?;
        let response = error_for_status(response, "File status")
            .await
            .map_err(GeminiError::InferenceError)?;

        let file: FileResource = response.json().await.map_err(|e| {
            GeminiError::ResponseError(format!("Failed to parse file resource: {e}"))
        })?;

        Ok(media_status_from_file(&file))
    }

    async fn generate(&self, prompt: &str, media: Option<&MediaHandle>) -> Result<String> {
        let mut parts = Vec::with_capacity(2);
        if let Some(media) = media {
            parts.push(Part::FileData {
                mime_type: &media.mime_type,
                file_uri: &media.uri,
            });
        }
        parts.push(Part::Text(prompt));

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
        };

        debug!(
            "Gemini generateContent: {} prompt chars, media={}",
            prompt.len(),
            media.is_some()
        );

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::InferenceError(describe_request_error(e)))?;
        let response = error_for_status(response, "generateContent")
            .await
            .map_err(GeminiError::InferenceError)?;

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            GeminiError::ResponseError(format!("Failed to parse generateContent response: {e}"))
        })?;

        Ok(response_text(generated)?)
    }
}
