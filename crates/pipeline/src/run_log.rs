//! Append-only event log and per-run state snapshots
//!
//! Every write is best-effort: failures are reported through `tracing` and
//! never change the outcome of the run that produced them.

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;
use vidquest_core::config::LoggingConfig;
use vidquest_core::error::{Result, ResultExt};
use vidquest_core::PipelineState;

/// Writes stage output and final run state under the configured log directory
#[derive(Debug, Clone)]
pub struct RunLogger {
    log_dir: PathBuf,
    event_log: PathBuf,
}

impl RunLogger {
    pub fn new(config: &LoggingConfig) -> Self {
        let log_dir = PathBuf::from(&config.log_dir);
        let event_log = log_dir.join(&config.event_log_file);
        Self { log_dir, event_log }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn event_log_path(&self) -> &Path {
        &self.event_log
    }

    /// Append one stage's output under a `=== STEP @ timestamp ===` header
    ///
    /// Strings are written verbatim, anything else as pretty-printed JSON.
    pub async fn append_event<T: Serialize + ?Sized>(&self, step: &str, content: &T) {
        if let Err(e) = self.try_append_event(step, content).await {
            warn!(
                "Failed to append '{step}' to {}: {e}",
                self.event_log.display()
            );
        }
    }

    /// Write the complete state to `run_<timestamp>_<run-id-prefix>.json`
    ///
    /// Returns the snapshot path, or `None` if it could not be written.
    pub async fn save_snapshot(&self, state: &PipelineState, run_id: Uuid) -> Option<PathBuf> {
        match self.try_save_snapshot(state, run_id).await {
            Ok(path) => {
                debug!("Saved run snapshot to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to save snapshot for run {run_id}: {e}");
                None
            }
        }
    }

    async fn try_append_event<T: Serialize + ?Sized>(&self, step: &str, content: &T) -> Result<()> {
        let body = match serde_json::to_value(content)? {
            Value::String(text) => text,
            other => serde_json::to_string_pretty(&other)?,
        };
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        let section = format!("\n=== {} @ {timestamp} ===\n{body}\n", step.to_uppercase());

        fs::create_dir_all(&self.log_dir)
            .await
            .context("Failed to create log directory")?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.event_log)
            .await
            .context("Failed to open event log")?;
        file.write_all(section.as_bytes())
            .await
            .context("Failed to write event log")?;
        file.flush().await.context("Failed to write event log")?;
        Ok(())
    }

    async fn try_save_snapshot(&self, state: &PipelineState, run_id: Uuid) -> Result<PathBuf> {
        let path = self.log_dir.join(snapshot_file_name(run_id));
        let json = serde_json::to_string_pretty(state)?;

        fs::create_dir_all(&self.log_dir)
            .await
            .context("Failed to create log directory")?;
        fs::write(&path, json)
            .await
            .context("Failed to write run snapshot")?;
        Ok(path)
    }
}

fn snapshot_file_name(run_id: Uuid) -> String {
    let id = run_id.simple().to_string();
    let prefix = id.get(..8).unwrap_or(&id);
    format!(
        "run_{}_{prefix}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}
