//! Insight Factory - asynchronous sales-report pipeline
//!
//! A CLI front end over the report pipeline: it validates the request,
//! acknowledges it immediately, then lets the pipeline aggregate sales,
//! generate an executive summary, and spool the report email.
//!
//! Exit codes:
//!   0 - Success (the pipeline ran; per-request failures surface in logs)
//!   1 - Runtime error (bad arguments, unreadable data file, etc.)

mod cli;
mod config;
mod email;
mod models;
mod pipeline;
mod sales;
mod summary;

use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use email::{EmailDispatcher, OutboxMailer};
use indicatif::ProgressBar;
use models::{ReportAck, ReportRequest};
use pipeline::{ReportPipeline, ReportWorker};
use sales::{AggregationService, InMemorySaleStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use summary::SummaryGenerator;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Insight Factory v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the report request
    match run_report(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Report request failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .insight-factory.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".insight-factory.toml");

    if path.exists() {
        eprintln!("⚠️  .insight-factory.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .insight-factory.toml")?;

    println!("✅ Created .insight-factory.toml with default settings.");
    println!("   Edit it to set the model endpoint, token, and outbox directory.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Accept one report request and drive the pipeline to completion.
async fn run_report(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_path = args.data.clone().context("--data is required")?;
    let from = args.from.context("--from is required")?;
    let to = args.to.context("--to is required")?;
    let email_to = args.email_to.clone().context("--email-to is required")?;

    // Step 1: Load the sales data
    println!("📦 Loading sales data: {}", data_path.display());
    let store = InMemorySaleStore::load(&data_path)?;
    info!("Loaded {} sale records", store.len());

    if store.is_empty() {
        warn!("Sales data file contains no records; the report will carry sentinel values");
    }

    // Step 2: Assemble the pipeline
    if config.model.token_configured() {
        println!("🤖 Narrative summaries: {}", config.model.id);
        println!("   Endpoint: {}", config.model.api_url);
        println!("   Timeout: {}s", config.model.timeout_seconds);
    } else {
        println!("📋 No model token configured - using templated summaries");
    }

    let outbox = PathBuf::from(&config.email.outbox);
    println!("📬 Outbox: {}", outbox.display());

    let pipeline = Arc::new(ReportPipeline::new(
        AggregationService::new(Arc::new(store)),
        SummaryGenerator::new(config.model.clone()),
        EmailDispatcher::new(Arc::new(OutboxMailer::new(outbox.clone()))),
    ));

    let worker = ReportWorker::spawn(pipeline, config.worker.queue_capacity);

    // Step 3: Acknowledge, then hand the request to the pipeline
    let request_id = Uuid::new_v4().to_string();
    let request = ReportRequest {
        from,
        to,
        branch: args.report_branch.clone(),
        email_to: email_to.clone(),
        request_id: request_id.clone(),
    };

    let ack = ReportAck::processing(&request_id, &email_to);
    println!("\n📨 Request accepted:");
    println!("{}", serde_json::to_string_pretty(&ack)?);

    worker.submit(request).await?;

    // Step 4: Drain the pipeline
    let spinner = if args.quiet {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Generating report...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    worker.join().await?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    println!("\n✅ Report pipeline finished. Check the outbox at: {}", outbox.display());
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .insight-factory.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
