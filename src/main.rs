//! DSEI exhibitor scraper entry point
//!
//! This is the command-line interface for the exhibitor directory scraper.

use clap::Parser;
use dsei_scraper::config::{load_config_or_default, Config};
use dsei_scraper::crawler::{scrape_to_csv, Coordinator};
use dsei_scraper::output::{print_summary, write_csv};
use dsei_scraper::url::SiteUrls;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Scrapes the DSEI exhibitor directory into a CSV file
///
/// Walks the paginated exhibitor listing, fetches every company's detail
/// page and writes name, tags, overview and website per company.
#[derive(Parser, Debug)]
#[command(name = "dsei-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Scrapes the DSEI exhibitor directory into CSV", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in DSEI settings when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// First listing page to fetch
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    start_page: Option<u32>,

    /// Maximum number of listing pages to fetch (unbounded when omitted)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_pages: Option<u32>,

    /// CSV output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Skip companies whose detail page failed instead of writing empty rows
    #[arg(long)]
    strict: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without sending requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };
    apply_overrides(&mut config, &cli);

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = setup_logging(cli.verbose, cli.quiet, &config.output.log_path)?;

    match &cli.config {
        Some(path) => tracing::info!("Configuration loaded from: {}", path.display()),
        None => tracing::info!("Using built-in configuration"),
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_scrape(&config).await
    }
}

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(start_page) = cli.start_page {
        config.run.start_page = start_page;
    }
    if cli.max_pages.is_some() {
        config.run.max_pages = cli.max_pages;
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if cli.strict {
        config.run.strict = true;
    }
}

/// Sets up the console and log file subscribers
///
/// The console follows the verbosity flags; the log file always records
/// DEBUG and above for this crate.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log_path: &str,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let console_filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dsei_scraper=info,warn"),
            1 => EnvFilter::new("dsei_scraper=debug,info"),
            _ => EnvFilter::new("dsei_scraper=trace,debug"),
        }
    };

    let log_path = Path::new(log_path);
    let log_dir = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&log_dir)?;
    let file_name = log_path
        .file_name()
        .ok_or_else(|| format!("Log path has no file name: {}", log_path.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("dsei_scraper=debug,warn"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let urls = SiteUrls::new(&config.site)?;

    println!("=== DSEI Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Listing search group: {}", config.site.listing_search_group);
    println!("  Detail search group: {}", config.site.detail_search_group);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Max retries: {}", config.http.max_retries);

    println!("\nDelays:");
    println!("  Between companies: {}ms", config.delays.between_companies_ms);
    println!("  Between pages: {}ms", config.delays.between_pages_ms);

    println!("\nRun:");
    println!("  Start page: {}", config.run.start_page);
    match config.run.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unbounded"),
    }
    println!("  Strict: {}", config.run.strict);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!("  Log: {}", config.output.log_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start with: {}",
        urls.listing_url(config.run.start_page)?
    );

    Ok(())
}

/// Handles the main scrape, saving partial results on Ctrl-C
async fn handle_scrape(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let mut coordinator = Coordinator::from_config(config)?;

    let outcome = tokio::select! {
        result = scrape_to_csv(&mut coordinator, config) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(summary)) => {
            print_summary(&summary);
            Ok(())
        }
        Some(Err(e)) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
        None => {
            tracing::warn!("Scraping interrupted by user");

            let mut summary = coordinator.summary().clone();
            summary.records_collected = coordinator.records().len() as u64;
            summary.elapsed = started.elapsed();

            if coordinator.records().is_empty() {
                tracing::warn!("No data to save");
            } else {
                let written = write_csv(
                    coordinator.records(),
                    Path::new(&config.output.csv_path),
                    &config.output.tags_separator,
                )?;
                summary.records_written = Some(written);
            }
            print_summary(&summary);

            Err("Scraping interrupted by user".into())
        }
    }
}
