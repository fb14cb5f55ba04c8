//! Sitemap-Harvest main entry point
//!
//! This is the command-line interface for the Sitemap-Harvest extractor.

use anyhow::Context;
use clap::Parser;
use sitemap_harvest::config::{load_config_with_hash, validate, Config, RootCheck};
use sitemap_harvest::crawler::run_harvest;
use sitemap_harvest::output::print_statistics;
use sitemap_harvest::source::UrlSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Harvest: sitemap-to-CSV extraction
///
/// Fetches `{base_url}/sitemap.xml` for every base URL listed in the input
/// CSV and writes each `<loc>` it finds to a `site,url` CSV file. The output
/// file is rewritten after every site, so partial progress survives an
/// interrupted run.
#[derive(Parser, Debug)]
#[command(name = "sitemap-harvest")]
#[command(version)]
#[command(about = "Extract sitemap locations into a CSV file", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// CSV file listing base URLs (overrides input.path)
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,

    /// Output CSV file (overrides output.path)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Path appended to every base URL (overrides sitemap.path)
    #[arg(long, value_name = "PATH")]
    sitemap_path: Option<String>,

    /// Require the namespaced urlset root element
    #[arg(long)]
    strict_root: bool,

    /// Request timeout in seconds (overrides http.timeout-secs)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration and base URLs without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    let stats = run_harvest(&config).await.map_err(|e| {
        tracing::error!("Harvest failed: {}", e);
        e
    })?;

    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_harvest=info,warn"),
            1 => EnvFilter::new("sitemap_harvest=debug,info"),
            2 => EnvFilter::new("sitemap_harvest=trace,debug"),
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

/// Loads the configuration file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(input) = &cli.input {
        config.input.path = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(sitemap_path) = &cli.sitemap_path {
        config.sitemap.path = sitemap_path.clone();
    }
    if cli.strict_root {
        config.sitemap.root_check = RootCheck::Strict;
    }
    if cli.timeout.is_some() {
        config.http.timeout_secs = cli.timeout;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Sitemap-Harvest Dry Run ===\n");

    println!("Sitemap:");
    println!("  Path: {}", config.sitemap.path);
    println!("  Root check: {:?}", config.sitemap.root_check);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    match config.http.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    println!("  Follow redirects: {}", config.http.follow_redirects);

    println!("\nOutput:");
    println!("  File: {}", config.output.path);
    println!("  Quote char: {:?}", config.output.quote_char);
    println!("  Atomic write: {}", config.output.atomic_write);

    let source = if config.sites.is_empty() {
        println!("\nInput: {} (column '{}')", config.input.path, config.input.column);
        UrlSource::csv(&config.input.path, &config.input.column)
    } else {
        println!("\nInput: inline sites");
        UrlSource::List(config.sites.clone())
    };

    let base_urls = source.load()?;
    println!("\nSitemaps ({}):", base_urls.len());
    for base_url in &base_urls {
        println!("  - {}{}", base_url, config.sitemap.path);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
