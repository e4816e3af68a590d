//! Library interface for the vidquest CLI
//!
//! This module exposes the report rendering for integration testing while
//! keeping the command handling in main.rs.

pub mod render;

pub use anyhow::Result;
pub use vidquest_core::config::Config;
