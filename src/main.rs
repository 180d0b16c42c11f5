//! Scrap main entry point
//!
//! This is the command-line interface for the Scrap crawl engine.

use anyhow::Context;
use clap::Parser;
use scrap::config::{
    build_route, load_config_with_hash, open_bucket, open_sink, BucketKind, Config,
};
use scrap::crawler::{HttpOptions, HttpRetriever, RequestAuth, Scraper, ScraperConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scrap: a route-dispatching crawl engine
///
/// Scrap fetches the start URLs from a TOML config, hands each page to the
/// first route whose pattern matches it, and follows the links the route's
/// selectors pick out until no work is left.
#[derive(Parser, Debug)]
#[command(name = "scrap")]
#[command(version)]
#[command(about = "A route-dispatching crawl engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scrap=info,warn"),
            1 => EnvFilter::new("scrap=debug,info"),
            2 => EnvFilter::new("scrap=trace,debug"),
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

/// Handles the --dry-run mode: config is already validated, show the plan
fn handle_dry_run(config: &Config) {
    println!("=== Scrap Dry Run ===\n");

    println!("HTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Max redirects: {}", config.http.max_redirects);
    if let Some(auth) = &config.auth {
        println!("  Basic auth as: {}", auth.username);
    }

    println!("\nBucket:");
    match config.bucket.kind {
        BucketKind::Memory => println!("  In memory"),
        BucketKind::Sqlite => println!(
            "  SQLite: {}",
            config.bucket.path.as_deref().unwrap_or(":memory:")
        ),
    }

    println!("\nLogs:");
    println!(
        "  Remarks: {}",
        config.logging.remarks.as_deref().unwrap_or("stderr")
    );
    println!(
        "  Debug: {}",
        config.logging.debug.as_deref().unwrap_or("stderr")
    );

    println!("\nRoutes ({}), first match wins:", config.routes.len());
    for (i, route) in config.routes.iter().enumerate() {
        println!("  {}. {:?} {}", i + 1, route.kind, route.pattern);
        for selector in &route.follow {
            println!("     follow: {}", selector);
        }
        if let Some(remark) = &route.remark {
            println!("     remark: {}", remark);
        }
    }

    println!("\nStart URLs ({}):", config.crawl.start.len());
    for url in &config.crawl.start {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let retriever = HttpRetriever::new(&HttpOptions::from(&config.http))
        .context("Failed to build HTTP client")?;
    let bucket = open_bucket(&config.bucket).context("Failed to open bucket")?;
    let remarks = open_sink(config.logging.remarks.as_deref())
        .context("Failed to open remarks log")?;
    let debug = open_sink(config.logging.debug.as_deref()).context("Failed to open debug log")?;

    let mut scraper_config = ScraperConfig::new()
        .retriever(retriever)
        .remarks(remarks)
        .debug(debug);
    scraper_config.bucket = Some(bucket);
    if let Some(auth) = &config.auth {
        scraper_config = scraper_config.auth(RequestAuth::from(auth));
    }

    let scraper = Scraper::new(scraper_config)?;
    for entry in &config.routes {
        scraper.push_route(build_route(entry)?);
    }

    tracing::info!(
        "Starting crawl with {} start URLs and {} routes",
        config.crawl.start.len(),
        scraper.route_count()
    );

    for url in &config.crawl.start {
        let outcome = scraper.scrape(url);
        tracing::debug!(url = %url, ?outcome, "Submitted start URL");
    }

    scraper.wait().await;

    let stats = scraper.stats();
    tracing::info!("Crawl completed");
    println!("{}", stats);

    Ok(())
}
