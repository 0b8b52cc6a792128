//! webrank main entry point
//!
//! This is the command-line interface for the webrank crawler and ranker.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use webrank::config::{load_config_with_hash, validate, Config};
use webrank::crawler::crawl;
use webrank::output::{print_ranking, print_statistics, write_markdown_report, RankingSummary};
use webrank::url::rewrite_shorthand;

/// webrank: crawl a site and rank its pages
///
/// webrank fetches every page reachable from a seed URL that passes the
/// configured host and URL filters, records the link graph between them and
/// ranks the pages with PageRank.
#[derive(Parser, Debug)]
#[command(name = "webrank")]
#[command(version)]
#[command(about = "Crawl a site and rank its pages with PageRank", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the seed URL; the http:// prefix may be omitted
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Override the number of parallel workers
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Override how many pages are reported
    #[arg(short, long, value_name = "N")]
    top: Option<usize>,

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
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config, config_hash, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webrank=info,warn"),
            1 => EnvFilter::new("webrank=debug,info"),
            2 => EnvFilter::new("webrank=trace,debug"),
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

/// Applies `--seed`, `--workers` and `--top`, then validates again
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(seed) = &cli.seed {
        let seed = rewrite_shorthand(seed).unwrap_or_else(|| seed.clone());
        tracing::info!("Seed overridden on the command line: {}", seed);
        config.crawler.seed_url = seed;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(top) = cli.top {
        config.rank.top_n = top;
    }

    validate(config)?;
    Ok(())
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== webrank Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", config.crawler.seed_url);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    if config.crawler.max_depth == 0 {
        println!("  Max depth: unlimited");
    } else {
        println!("  Max depth: {}", config.crawler.max_depth);
    }
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nFilter:");
    if config.filter.hosts.is_empty() {
        println!("  Hosts: any");
    } else {
        for host in &config.filter.hosts {
            println!("  - {}", host);
        }
    }
    if let Some(pattern) = &config.filter.pattern {
        println!("  Pattern: {}", pattern);
    }

    println!("\nRanking:");
    println!("  Dampening: {}", config.rank.dampening);
    println!("  Tolerance: {:e}", config.rank.tolerance);
    println!("  Max iterations: {}", config.rank.max_iterations);
    println!("  Top: {}", config.rank.top_n);

    if let Some(path) = &config.output.report_path {
        println!("\nReport: {}", path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String, quiet: bool) -> Result<()> {
    let top_n = config.rank.top_n;
    let report_path = config.output.report_path.clone();

    let report = crawl(config).await.context("Crawl failed")?;
    let summary = RankingSummary::from_report(&report, top_n, Some(config_hash));

    if !quiet {
        print_statistics(&summary.stats);
        print_ranking(&summary);
    }

    if let Some(path) = report_path {
        write_markdown_report(&summary, Path::new(&path))
            .context("Failed to write ranking report")?;
    }

    Ok(())
}
