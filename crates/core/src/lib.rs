//! Core types and traits for the vidquest video research pipeline
//!
//! This crate provides the foundational abstractions shared by the provider,
//! pipeline and binary crates:
//!
//! - **State**: the record threaded through the four pipeline stages
//! - **Services**: traits for the multimodal inference and web search backends
//! - **Parsing**: best-effort list extraction from model output
//! - **Configuration**: layered configuration loading
//! - **Error handling**: unified error types
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod media;
pub mod parsing;
pub mod services;
pub mod state;

// Re-export main types for convenience
pub use config::{
    Config, InferenceConfig, LoggingConfig, PollPolicy, SafeSearch, SearchConfig, ServerConfig,
};
pub use error::{Error, Result, ResultExt};
pub use media::MediaContainer;
pub use services::{
    InferenceService, MediaHandle, MediaStatus, RawHit, SearchQuery, SearchService,
};
pub use state::{PipelineState, ResultPack, RunReport, SearchHit};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
