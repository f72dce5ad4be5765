//! Sitemap-Scribe main entry point
//!
//! This is the command-line interface for the Sitemap-Scribe documentation crawler.

use anyhow::{Context, Result};
use clap::Parser;
use sitemap_scribe::config::{compute_config_hash, parse_config, validate, Config};
use sitemap_scribe::crawler::Coordinator;
use sitemap_scribe::output::print_statistics;
use sitemap_scribe::DomainMatch;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap-Scribe: a sitemap-seeded documentation crawler
///
/// Sitemap-Scribe reads one or more sitemaps, crawls the documentation pages
/// they list breadth-first, and writes every page as markdown together with a
/// JSON corpus prepared for retrieval indexing.
#[derive(Parser, Debug)]
#[command(name = "sitemap-scribe")]
#[command(version)]
#[command(about = "A sitemap-seeded documentation crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sitemap source, local path or URL (repeatable; replaces configured sources)
    #[arg(short, long = "sitemap", value_name = "SOURCE")]
    sitemaps: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Domain that crawled URLs must belong to
    #[arg(long, value_name = "DOMAIN")]
    base_domain: Option<String>,

    /// Pause between requests in seconds
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Maximum link depth from a seed URL
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Only crawl the URLs listed in sitemaps
    #[arg(long)]
    no_recursive: bool,

    /// Do not probe sites for unlisted sitemaps
    #[arg(long)]
    no_discover_sitemaps: bool,

    /// Skip the second pass over navigation links
    #[arg(long)]
    no_navigation_sweep: bool,

    /// Honor robots.txt Disallow rules and Crawl-delay
    #[arg(long)]
    respect_robots: bool,

    /// Match the base domain against URL hosts instead of whole URLs
    #[arg(long)]
    host_match: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    let config_hash = match &cli.config {
        Some(path) => {
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Some(hash)
        }
        None => None,
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_scribe=info,warn"),
            1 => EnvFilter::new("sitemap_scribe=debug,info"),
            _ => EnvFilter::new("sitemap_scribe=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line flags take precedence over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.sitemaps.is_empty() {
        config.source.sitemaps = cli.sitemaps.clone();
    }
    if let Some(domain) = &cli.base_domain {
        config.source.base_domain = domain.clone();
    }
    if cli.host_match {
        config.source.domain_match = DomainMatch::Host;
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_secs = delay;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if cli.no_recursive {
        config.crawler.recursive = false;
    }
    if cli.no_discover_sitemaps {
        config.crawler.auto_discover_sitemaps = false;
    }
    if cli.no_navigation_sweep {
        config.crawler.navigation_sweep = false;
    }
    if cli.respect_robots {
        config.crawler.respect_robots_txt = true;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-Scribe Dry Run ===\n");

    println!("Sources ({}):", config.source.sitemaps.len());
    for sitemap in &config.source.sitemaps {
        println!("  - {}", sitemap);
    }
    println!(
        "  Base domain: {} ({:?} match)",
        config.source.base_domain, config.source.domain_match
    );

    println!("\nCrawler Configuration:");
    println!("  Recursive: {}", config.crawler.recursive);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Delay: {}s", config.crawler.delay_secs);
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);
    println!("  Chunk size: {} words", config.crawler.chunk_size);
    println!(
        "  Sitemap discovery: {}",
        config.crawler.auto_discover_sitemaps
    );
    println!("  Navigation sweep: {}", config.crawler.navigation_sweep);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots_txt);

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("Output: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: Option<String>) -> Result<()> {
    let output_dir = config.output.directory.clone();

    let mut coordinator = Coordinator::new(config).context("failed to build HTTP client")?;
    if let Some(hash) = config_hash {
        coordinator = coordinator.with_config_hash(hash);
    }

    match coordinator.run().await {
        Ok(corpus) => {
            tracing::info!("Crawl completed successfully");
            println!();
            print_statistics(&corpus.metadata.statistics, &output_dir);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
