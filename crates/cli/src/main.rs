//! vidquest CLI - video summary, topics, web research and follow-up questions
//!
//! This binary provides the command-line interface for the vidquest pipeline.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use vidquest::render::render_markdown;
use vidquest_core::config::Config;
use vidquest_pipeline::{CancellationToken, VideoPipeline};

#[derive(Parser)]
#[command(name = "vidquest")]
#[command(about = "Summarize a video, extract topics, search the web and propose questions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline on a local video (mp4, mov, avi)
    Run {
        /// Video file to analyze
        video: PathBuf,

        /// What you are trying to learn; biases the generated questions
        #[arg(short, long)]
        query: Option<String>,

        /// Print the report as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Start the HTTP upload server
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Run { video, query, json }) => {
            run(&video, query, json, cli.config.as_deref()).await
        }
        Some(Commands::Serve { port }) => serve(port, cli.config.as_deref()).await,
        None => {
            println!("Run 'vidquest run <VIDEO>' to analyze a video, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "vidquest={level},vidquest_core={level},vidquest_gemini={level},\
             vidquest_search={level},vidquest_pipeline={level},vidquest_server={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Load and validate layered configuration
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the four stages on one video and print the report
async fn run(video: &Path, query: Option<String>, json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = VideoPipeline::from_config(&config).context("Failed to set up pipeline")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling run");
            on_interrupt.cancel();
        }
    });

    info!("Analyzing {}", video.display());
    let outcome = pipeline
        .run(video, query, cancel)
        .await
        .with_context(|| format!("Pipeline failed for {}", video.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    print!("{}", render_markdown(&outcome.report));
    match &outcome.snapshot_path {
        Some(path) => println!("\nResponses logged to: {}", path.display()),
        None => println!("\nRun snapshot could not be written (see warnings above)"),
    }
    Ok(())
}

/// Start the HTTP upload server
async fn serve(port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Preparing to start vidquest server...");
    vidquest_server::run_server(config)
        .await
        .context("Server failed")?;
    Ok(())
}
