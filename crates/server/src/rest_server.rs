//! REST API server implementation using Axum
//!
//! One endpoint accepts a video upload and runs it through the pipeline; the
//! other reports liveness.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use vidquest_core::config::ServerConfig;
use vidquest_core::error::Error;
use vidquest_core::MediaContainer;
use vidquest_pipeline::{RunOutcome, VideoPipeline};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VideoPipeline>,
    /// Cancelled on shutdown; every run gets a child token
    pub shutdown: CancellationToken,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let body_limit = server_config.max_upload_mb.saturating_mul(1024 * 1024);

    Router::new()
        .route("/api/v1/runs", post(create_run_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// A video received from a multipart form
struct UploadedVideo {
    file: NamedTempFile,
    original_name: String,
}

/// POST /api/v1/runs
///
/// Multipart form with a `video` file part and an optional `query` text part.
/// The upload lives in a temporary file that is removed when the request ends.
async fn create_run_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RunOutcome>, ApiError> {
    let mut video: Option<UploadedVideo> = None;
    let mut query: Option<String> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("video") => {
                let original_name = field.file_name().unwrap_or_default().to_string();
                let container = MediaContainer::from_path(Path::new(&original_name))
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

                let file = tempfile::Builder::new()
                    .prefix("vidquest-upload-")
                    .suffix(&format!(".{}", container.extension()))
                    .tempfile()
                    .map_err(|e| ApiError::Internal(Error::from(e)))?;
                let mut writer = tokio::fs::File::from_std(
                    file.as_file()
                        .try_clone()
                        .map_err(|e| ApiError::Internal(Error::from(e)))?,
                );

                let mut size = 0usize;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len();
                    writer
                        .write_all(&chunk)
                        .await
                        .map_err(|e| ApiError::Internal(Error::from(e)))?;
                }
                writer
                    .flush()
                    .await
                    .map_err(|e| ApiError::Internal(Error::from(e)))?;

                info!("Received upload '{original_name}' ({size} bytes)");
                video = Some(UploadedVideo {
                    file,
                    original_name,
                });
            }
            Some("query") => {
                query = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let video =
        video.ok_or_else(|| ApiError::InvalidRequest("Missing 'video' file part".into()))?;

    info!(
        "Run request: video='{}', query={:?}",
        video.original_name, query
    );
    let outcome = state
        .pipeline
        .run(video.file.path(), query, state.shutdown.child_token())
        .await?;

    Ok(Json(outcome))
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    use serde_json::json;

    let health_status = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, Json(health_status))
}

/// Error handling for API endpoints
#[derive(Debug)]
pub enum ApiError {
    InvalidRequest(String),
    PayloadTooLarge(String),
    ServiceUnavailable(String),
    Internal(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(err) => {
                error!("Run failed: {err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Cancelled => ApiError::ServiceUnavailable("Server is shutting down".into()),
            err if err.is_client_error() => ApiError::InvalidRequest(err.to_string()),
            err => ApiError::Internal(err),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::InvalidRequest(err.body_text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                ApiError::from(Error::invalid_input("Unsupported video container")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(Error::search("backend down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::from(Error::Cancelled), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
