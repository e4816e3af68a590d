//! Four-stage video research pipeline
//!
//! A run uploads a video to the inference service and summarizes it, extracts
//! topics from the summary, searches the web once per topic, and finally asks
//! the model for follow-up questions. Stages run strictly in sequence over one
//! [`vidquest_core::PipelineState`].
//!
//! # Public API
//!
//! - [`VideoPipeline`] - Driver that owns the injected services
//! - [`RunOutcome`] - Report, run id and snapshot path of a completed run
//! - [`Stage`] / [`StageContext`] - Individual stages, runnable on their own
//! - [`RunLogger`] - Best-effort event log and run snapshots
//! - [`wait_until_ready`] - Bounded, cancellable media readiness wait

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod pipeline;
mod prompts;
mod readiness;
mod run_log;
pub mod stages;

pub use pipeline::{RunOutcome, VideoPipeline};
pub use readiness::wait_until_ready;
pub use run_log::RunLogger;
pub use stages::{Stage, StageContext, BRIEF_SKIP_LEADING};
pub use tokio_util::sync::CancellationToken;
