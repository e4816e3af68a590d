//! The four pipeline stages
//!
//! Each stage reads what earlier stages left in [`PipelineState`], makes its
//! external call(s), writes exactly one new field and appends that field to
//! the event log.

use crate::prompts::{self, format_prompt};
use crate::readiness::wait_until_ready;
use crate::run_log::RunLogger;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;
use vidquest_core::config::SearchConfig;
use vidquest_core::error::{Error, Result};
use vidquest_core::parsing::{parse_questions, parse_topics};
use vidquest_core::{
    InferenceService, MediaContainer, PipelineState, PollPolicy, ResultPack, SearchHit,
    SearchQuery, SearchService,
};

/// Results at the head of each pack that are left out of the question prompt
pub const BRIEF_SKIP_LEADING: usize = 3;

/// Everything a stage needs besides the state itself, scoped to one run
#[derive(Clone)]
pub struct StageContext {
    pub run_id: Uuid,
    pub inference: Arc<dyn InferenceService>,
    pub search: Arc<dyn SearchService>,
    pub search_config: SearchConfig,
    pub poll_policy: PollPolicy,
    pub logger: RunLogger,
    pub cancel: CancellationToken,
}

/// Stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Summarize,
    Topics,
    Search,
    Questions,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Summarize,
        Stage::Topics,
        Stage::Search,
        Stage::Questions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Summarize => "summarize",
            Stage::Topics => "topics",
            Stage::Search => "search",
            Stage::Questions => "questions",
        }
    }

    pub async fn run(&self, ctx: &StageContext, state: &mut PipelineState) -> Result<()> {
        match self {
            Stage::Summarize => summarize_video(ctx, state).await,
            Stage::Topics => extract_topics(ctx, state).await,
            Stage::Search => search_topics(ctx, state).await,
            Stage::Questions => generate_questions(ctx, state).await,
        }
    }
}

/// Stage 1: upload the video, wait until it is processed, summarize it
pub async fn summarize_video(ctx: &StageContext, state: &mut PipelineState) -> Result<()> {
    if state.video_path.as_os_str().is_empty() {
        return Err(Error::precondition(
            "summarize video: 'video_path' is missing in state",
        ));
    }
    let container = MediaContainer::from_path(&state.video_path)?;

    info!(
        "[{}] Uploading {} ({})",
        ctx.run_id,
        state.video_path.display(),
        container.mime_type()
    );
    let handle = ctx
        .inference
        .upload_media(&state.video_path, container)
        .await?;
    debug!("[{}] Uploaded as {}", ctx.run_id, handle.name);

    wait_until_ready(ctx.inference.as_ref(), &handle, ctx.poll_policy, &ctx.cancel).await?;

    let response = ctx
        .inference
        .generate(prompts::SUMMARIZE_VIDEO, Some(&handle))
        .await?;
    let summary = response.trim();
    if summary.is_empty() {
        return Err(Error::EmptyResponse("video summarization".to_string()));
    }
    debug!("[{}] Summary: {} chars", ctx.run_id, summary.len());

    ctx.logger.append_event("summary", summary).await;
    state.summary = Some(summary.to_string());
    Ok(())
}

/// Stage 2: extract up to six topics from the summary
pub async fn extract_topics(ctx: &StageContext, state: &mut PipelineState) -> Result<()> {
    let summary = state
        .summary
        .as_deref()
        .ok_or_else(|| Error::precondition("extract topics: 'summary' is missing in state"))?;

    let prompt = format_prompt(prompts::EXTRACT_TOPICS, &[("summary", summary)]);
    let response = ctx.inference.generate(&prompt, None).await?;
    let topics = parse_topics(&response);
    debug!("[{}] Extracted {} topic(s)", ctx.run_id, topics.len());

    ctx.logger.append_event("topics", &topics).await;
    state.topics = Some(topics);
    Ok(())
}

/// Stage 3: one web search per topic, in topic order
pub async fn search_topics(ctx: &StageContext, state: &mut PipelineState) -> Result<()> {
    let topics = match state.topics.as_deref() {
        Some(topics) if !topics.is_empty() => topics,
        _ => {
            return Err(Error::precondition(
                "web search: 'topics' missing or empty in state",
            ))
        }
    };

    let max_results = ctx.search_config.max_results;
    let mut packs = Vec::with_capacity(topics.len());
    for topic in topics {
        let query = SearchQuery {
            text: topic.clone(),
            max_results,
            safe_search: ctx.search_config.safe_search,
            region: ctx.search_config.region.clone(),
        };
        let hits = ctx.search.search(&query).await?;
        debug!("[{}] '{topic}': {} hit(s)", ctx.run_id, hits.len());

        packs.push(ResultPack {
            topic: topic.clone(),
            results: hits
                .into_iter()
                .take(max_results)
                .map(SearchHit::from)
                .collect(),
        });
    }

    ctx.logger.append_event("search_results", &packs).await;
    state.search_results = Some(packs);
    Ok(())
}

/// Stage 4: generate follow-up questions from topics and search context
pub async fn generate_questions(ctx: &StageContext, state: &mut PipelineState) -> Result<()> {
    let topics = state
        .topics
        .as_deref()
        .ok_or_else(|| Error::precondition("generate questions: 'topics' is missing in state"))?;
    let packs = state.search_results.as_deref().ok_or_else(|| {
        Error::precondition("generate questions: 'search_results' is missing in state")
    })?;

    let topics_json = serde_json::to_string_pretty(topics)?;
    let brief_json = serde_json::to_string_pretty(&brief_payload(packs))?;
    let prompt = format_prompt(
        prompts::GENERATE_QUESTIONS,
        &[
            ("topics", topics_json.as_str()),
            ("brief", brief_json.as_str()),
            ("user_query", state.user_query.as_deref().unwrap_or("")),
        ],
    );
    debug!("[{}] Question prompt: {} chars", ctx.run_id, prompt.len());

    let response = ctx.inference.generate(&prompt, None).await?;
    let questions = parse_questions(&response);
    debug!("[{}] Generated {} question(s)", ctx.run_id, questions.len());

    ctx.logger.append_event("questions", &questions).await;
    state.questions = Some(questions);
    Ok(())
}

/// Per-topic search context forwarded to question generation
///
/// Keeps only the hits after the first [`BRIEF_SKIP_LEADING`] of each pack.
pub fn brief_payload(packs: &[ResultPack]) -> Vec<ResultPack> {
    packs
        .iter()
        .map(|pack| ResultPack {
            topic: pack.topic.clone(),
            results: pack
                .results
                .iter()
                .skip(BRIEF_SKIP_LEADING)
                .cloned()
                .collect(),
        })
        .collect()
}
