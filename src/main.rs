//! Image-Ripple main entry point
//!
//! This is the command-line interface for the Image-Ripple crawler.

use clap::Parser;
use image_ripple::config::{load_config_with_hash, Config};
use image_ripple::crawler::run_crawl;
use image_ripple::output::{print_report, write_markdown_report};
use image_ripple::pipeline::clear_cache_dir;
use image_ripple::CrawlUri;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Image-Ripple: a depth-bounded image crawler
///
/// Image-Ripple crawls pages reachable from the configured seeds, visits each
/// page at most once, and runs every image it finds through the configured
/// transforms.
#[derive(Parser, Debug)]
#[command(name = "image-ripple")]
#[command(version)]
#[command(about = "A depth-bounded image crawler", long_about = None)]
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

    /// Empty the image cache before crawling
    #[arg(long, conflicts_with = "dry_run")]
    fresh: bool,

    /// Crawl these seeds instead of the ones in the config (repeatable)
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Override the configured maximum depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Also write the crawl report as markdown to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if !cli.seeds.is_empty() {
        for seed in &cli.seeds {
            CrawlUri::parse(seed)?;
        }
        tracing::info!("Overriding configured seeds with {} from the command line", cli.seeds.len());
        config.seeds = cli.seeds;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.fresh {
        tracing::info!("Clearing image cache at {}", config.images.cache_path);
        clear_cache_dir(Path::new(&config.images.cache_path)).await?;
    }

    handle_crawl(config, config_hash, cli.report.as_deref(), cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("image_ripple=info,warn"),
            1 => EnvFilter::new("image_ripple=debug,info"),
            2 => EnvFilter::new("image_ripple=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Image-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Strategy: {:?}", config.crawler.strategy);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    println!("  Same host only: {}", config.crawler.same_host_only);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nImages:");
    println!("  Cache: {}", config.images.cache_path);
    match &config.images.output_path {
        Some(path) => println!("  Output: {}", path),
        None => println!("  Output: (not written)"),
    }
    println!("  Transforms: {}", config.images.transforms.join(", "));
    println!(
        "  Tint: red={} green={} blue={}",
        config.images.tint.red, config.images.tint.green, config.images.tint.blue
    );

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: String,
    report_path: Option<&Path>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Seeds: {}, max depth: {}, transforms: {}",
        config.seeds.len(),
        config.crawler.max_depth,
        config.images.transforms.len()
    );

    let report = match run_crawl(config, Some(config_hash)).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    if !quiet {
        print_report(&report);
    }

    if let Some(path) = report_path {
        write_markdown_report(&report, path)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}
