//! link-trawl main entry point
//!
//! This is the command-line interface for the link-trawl link validator.

use anyhow::Context;
use clap::Parser;
use link_trawl::config::{load_config_with_hash, validate, Config};
use link_trawl::crawler::crawl;
use link_trawl::output::{print_statistics, CrawlStatistics, OutputHandler, TsvReportWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// link-trawl: a breadth-first link validator
///
/// Crawls every page reachable from URL on the same origin and reports the
/// status of each internal link, plus external links, email references and
/// broken links, as tab-separated files.
#[derive(Parser, Debug)]
#[command(name = "link-trawl")]
#[command(version)]
#[command(about = "A breadth-first link validator", long_about = None)]
struct Cli {
    /// The URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of concurrent requests (overrides config)
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory for the report files (overrides config)
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Print the summary only, do not write report files
    #[arg(long)]
    no_files: bool,

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

    let config = load_settings(&cli)?;

    tracing::info!(
        "Max concurrency: {}, request timeout: {}s",
        config.crawler.max_concurrency,
        config.crawler.request_timeout
    );

    let report = crawl(&cli.url, &config)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.url))?;

    if !cli.no_files {
        TsvReportWriter::new(&config.output.directory)
            .write_report(&report)
            .context("Failed to write report files")?;
    }

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_trawl=info,warn"),
            1 => EnvFilter::new("link_trawl=debug,info"),
            2 => EnvFilter::new("link_trawl=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max_concurrency) = cli.max_concurrency {
        config.crawler.max_concurrency = max_concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout = timeout;
        config.crawler.connect_timeout = config.crawler.connect_timeout.min(timeout);
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }

    validate(&config).context("Invalid settings")?;
    Ok(config)
}
