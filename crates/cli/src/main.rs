//! `org-compass` entry point.
//!
//! This binary is the composition root. It:
//!
//! 1. Parses arguments and loads the configuration file.
//! 2. Installs the tracing subscriber, with optional OTLP span export.
//! 3. Builds the concrete collaborators (transcript parser, template prompt
//!    provider, OpenAI client) and injects them into a `PipelineExecutor`.
//! 4. Runs one analysis, retrying transient language model failures, and
//!    prints the dashboard to stdout.
//!
//! Ctrl-C cancels the run before its next stage starts.
//!
//! ## Module Layout
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | `args`        | clap argument definitions                         |
//! | `config`      | TOML configuration file and validation            |
//! | `retry`       | Whole-run retry with back-off                     |
//! | `telemetry`   | Subscriber and OTLP exporter installation         |

mod args;
mod config;
mod retry;
mod telemetry;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use ingest::TranscriptParser;
use llm::OpenAiClient;
use nodes::{PipelineExecutor, TemplatePromptProvider};
use pipeline::{LeadershipProfile, ProfileConfig};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::args::Args;
use crate::config::CompassConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = CompassConfig::load(args.config.as_deref())?;
    let telemetry = telemetry::init(&config.observability)?;

    let outcome = run(&args, &config).await;
    telemetry.shutdown();
    outcome
}

async fn run(args: &Args, config: &CompassConfig) -> anyhow::Result<()> {
    let raw = read_input(&args.input).await?;
    let profile = load_profile(&args.profile)?;

    let client = OpenAiClient::new(config.openai_config(config.api_key()?))?;
    info!(model = client.model(), "Using language model");

    let executor = PipelineExecutor::new(
        Arc::new(TranscriptParser::new()),
        Arc::new(TemplatePromptProvider::new()),
        Arc::new(client),
    )
    .with_adapter(config.adapter()?)
    .with_options(config.pipeline_options());

    let cancellation = executor.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; cancelling before the next stage");
            cancellation.cancel();
        }
    });

    let dashboard = retry::analyze_with_retry(
        &executor,
        &raw,
        args.communication_type.0,
        &profile,
        &config.retry,
    )
    .await
    .context("analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        println!("{}", dashboard.render_report(&profile));
    }
    Ok(())
}

async fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read standard input")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("failed to read {input}"))
}

fn load_profile(path: &Path) -> anyhow::Result<LeadershipProfile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read profile {}", path.display()))?;
    let config: ProfileConfig = toml::from_str(&text)
        .with_context(|| format!("invalid profile in {}", path.display()))?;
    LeadershipProfile::try_from(config)
        .with_context(|| format!("invalid profile in {}", path.display()))
}
