//! Site-Walker main entry point
//!
//! This is the command-line interface for the Site-Walker link mapper.

use anyhow::Context;
use clap::Parser;
use site_walker::config::{load_config_with_hash, validate, Config};
use site_walker::crawler::crawl;
use site_walker::output::{print_statistics, sorted_pages, write_markdown_summary, write_pages};
use site_walker::Termination;
use std::io;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Walker: a same-host site link mapper
///
/// Site-Walker crawls every page reachable from a root URL on the same host,
/// with a rate-limited pool of workers, and prints the links found on each
/// page.
#[derive(Parser, Debug)]
#[command(name = "site-walker")]
#[command(version = "1.0.0")]
#[command(about = "A same-host site link mapper", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "ROOT_URL")]
    root_url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Number of concurrent fetch workers
    #[arg(long)]
    workers: Option<usize>,

    /// Minimum time between two requests, in milliseconds
    #[arg(long, value_name = "MS")]
    rate_limit_ms: Option<u64>,

    /// Deadline for the whole run, in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Write a markdown summary to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Print run statistics after the crawl
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load_configuration(&cli)?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let report = crawl(&cli.root_url, &config, cancel)
        .await
        .with_context(|| format!("Failed to crawl {}", cli.root_url))?;

    let stdout = io::stdout();
    write_pages(&mut stdout.lock(), sorted_pages(&report)).context("Failed to write results")?;

    if cli.stats {
        println!();
        print_statistics(&report.stats);
    }

    if let Some(path) = &config.output.summary_path {
        write_markdown_summary(&report, config_hash.as_deref(), Path::new(path))
            .with_context(|| format!("Failed to write summary to {}", path))?;
        tracing::info!("Summary exported to: {}", path);
    }

    match report.termination {
        Termination::Completed => tracing::info!("Crawl completed successfully"),
        other => tracing::warn!("Crawl stopped early ({}), results are partial", other),
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout only carries crawl results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_walker=info,warn"),
            1 => EnvFilter::new("site_walker=debug,info"),
            2 => EnvFilter::new("site_walker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, if any, and applies command-line overrides
///
/// Returns the configuration and the hash of the file it was read from.
fn load_configuration(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(interval) = cli.rate_limit_ms {
        config.crawler.rate_limit_interval_ms = interval;
    }
    if let Some(timeout) = cli.timeout_secs {
        config.crawler.run_timeout_secs = timeout;
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;

    Ok((config, config_hash))
}

/// Cancels the crawl on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, stopping crawl");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}
