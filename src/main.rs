//! Shelf-Sweep main entry point
//!
//! Running the binary with no arguments performs one crawl of the default
//! catalog, saves the records beside the executable and exits.

use anyhow::Context;
use clap::Parser;
use shelf_sweep::config::{load_config_with_hash, Config};
use shelf_sweep::crawler::{Coordinator, Scheduler};
use shelf_sweep::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Sweep: a catalog-to-record scraper
///
/// Crawls every page of a paginated book catalog, extracts one record per
/// item and writes them as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "shelf-sweep")]
#[command(version)]
#[command(about = "Scrapes a paginated book catalog into JSON records", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write records here instead of next to the executable
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Run the daily scheduler instead of a single crawl
    #[arg(long)]
    schedule: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let mut coordinator =
        Coordinator::new(&config).context("failed to set up the crawl coordinator")?;
    if let Some(path) = cli.output {
        coordinator = coordinator.with_output_path(path);
    }

    if cli.schedule {
        handle_schedule(&config, &coordinator).await
    } else {
        handle_crawl(&config, &coordinator, cli.quiet).await;
        Ok(())
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_sweep=info,warn"),
            1 => EnvFilter::new("shelf_sweep=debug,info"),
            2 => EnvFilter::new("shelf_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Performs one persisting crawl
async fn handle_crawl(config: &Config, coordinator: &Coordinator, quiet: bool) {
    tracing::info!(
        "Starting crawl of {} with {} workers",
        config.catalog.root_url,
        coordinator.workers()
    );

    let outcome = coordinator.run(true).await;

    if !quiet {
        print_summary(&outcome.summary, outcome.saved_to.as_deref());
    }
}

/// Runs the daily scheduler until interrupted
async fn handle_schedule(config: &Config, coordinator: &Coordinator) -> anyhow::Result<()> {
    let scheduler = Scheduler::new(&config.schedule).context("invalid schedule configuration")?;

    tokio::select! {
        _ = scheduler.run(coordinator) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for shutdown signal")?;
            tracing::info!("Interrupted, stopping scheduler");
        }
    }

    Ok(())
}
