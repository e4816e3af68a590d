//! HTTP upload trigger for the vidquest pipeline
//!
//! Serves `POST /api/v1/runs` (multipart video upload, JSON report) and
//! `GET /health` on 127.0.0.1.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod rest_server;

use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use vidquest_core::config::Config;
use vidquest_pipeline::VideoPipeline;

pub use rest_server::{build_router, ApiError, AppState};
pub use vidquest_core::error::{Error, Result};

/// Run the HTTP server until Ctrl+C.
///
/// Builds the pipeline from `config`, binds `127.0.0.1:<server.port>` and
/// cancels in-flight runs on shutdown.
pub async fn run_server(config: Config) -> Result<()> {
    let pipeline = Arc::new(VideoPipeline::from_config(&config)?);
    let shutdown = CancellationToken::new();
    let state = AppState {
        pipeline,
        shutdown: shutdown.clone(),
    };
    let app = build_router(state, &config.server);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to {addr}: {e}")))?;

    println!("🚀 Starting vidquest server on http://{addr}");
    info!("REST server listening on http://{addr}");

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
                Err(e) => tracing::error!("Error setting up signal handler: {e}"),
            }
            signal.cancel();
        })
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    info!("vidquest server shut down successfully");
    Ok(())
}
