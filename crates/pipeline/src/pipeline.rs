//! Sequential driver for the four stages

use crate::run_log::RunLogger;
use crate::stages::{Stage, StageContext};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;
use vidquest_core::config::{Config, SearchConfig};
use vidquest_core::error::{Error, Result};
use vidquest_core::{
    InferenceService, MediaContainer, PipelineState, PollPolicy, RunReport, SearchService,
};

/// Result of one completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub report: RunReport,
    /// Snapshot of the final state, if it could be written
    pub snapshot_path: Option<PathBuf>,
    #[serde(skip)]
    pub state: PipelineState,
}

/// Runs videos through summarize, topics, search and questions in order
pub struct VideoPipeline {
    inference: Arc<dyn InferenceService>,
    search: Arc<dyn SearchService>,
    search_config: SearchConfig,
    poll_policy: PollPolicy,
    logger: RunLogger,
}

impl std::fmt::Debug for VideoPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPipeline")
            .field("inference", &"<InferenceService>")
            .field("search", &"<SearchService>")
            .field("search_config", &self.search_config)
            .field("poll_policy", &self.poll_policy)
            .field("logger", &self.logger)
            .finish()
    }
}

impl VideoPipeline {
    pub fn new(
        inference: Arc<dyn InferenceService>,
        search: Arc<dyn SearchService>,
        config: &Config,
    ) -> Self {
        Self {
            inference,
            search,
            search_config: config.search.clone(),
            poll_policy: config.inference.poll_policy(),
            logger: RunLogger::new(&config.logging),
        }
    }

    /// Build the pipeline with the providers named in `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let inference = vidquest_gemini::create_inference_provider(&config.inference)?;
        let search = vidquest_search::create_search_provider(&config.search)?;
        Ok(Self::new(inference, search, config))
    }

    pub fn logger(&self) -> &RunLogger {
        &self.logger
    }

    /// Run all four stages for one video
    ///
    /// The container is checked before any service is called. The snapshot is
    /// only written for runs that complete.
    pub async fn run(
        &self,
        video_path: &Path,
        user_query: Option<String>,
        cancel: CancellationToken,
    ) -> Result<RunOutcome> {
        MediaContainer::from_path(video_path)?;
        if !video_path.is_file() {
            return Err(Error::invalid_input(format!(
                "Video file not found: {}",
                video_path.display()
            )));
        }

        let run_id = Uuid::new_v4();
        let ctx = StageContext {
            run_id,
            inference: Arc::clone(&self.inference),
            search: Arc::clone(&self.search),
            search_config: self.search_config.clone(),
            poll_policy: self.poll_policy,
            logger: self.logger.clone(),
            cancel,
        };
        let mut state = PipelineState::new(video_path, user_query);

        info!("[{run_id}] Starting run for {}", video_path.display());
        let started = Instant::now();

        for (index, stage) in Stage::ALL.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                info!("[{run_id}] Cancelled before stage '{}'", stage.name());
                return Err(Error::Cancelled);
            }

            info!(
                "[{run_id}] Stage {}/{}: {}",
                index + 1,
                Stage::ALL.len(),
                stage.name()
            );
            let stage_started = Instant::now();
            if let Err(e) = stage.run(&ctx, &mut state).await {
                error!("[{run_id}] Stage '{}' failed: {e}", stage.name());
                return Err(e);
            }
            info!(
                "[{run_id}] Stage '{}' finished in {}ms",
                stage.name(),
                stage_started.elapsed().as_millis()
            );
        }

        let report = state.report()?;
        let snapshot_path = self.logger.save_snapshot(&state, run_id).await;
        info!(
            "[{run_id}] Run complete in {}ms: {} topic(s), {} question(s)",
            started.elapsed().as_millis(),
            report.topics.len(),
            report.questions.len()
        );

        Ok(RunOutcome {
            run_id,
            report,
            snapshot_path,
            state,
        })
    }
}
