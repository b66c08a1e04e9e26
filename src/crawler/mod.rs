//! Crawler module for page fetching and recursive traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and HTML element extraction
//! - The shared set of claimed URIs
//! - The depth-bounded recursive engine

mod dedup;
mod engine;
mod fetcher;
mod parser;

pub use dedup::UriSet;
pub use engine::Engine;
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpPageFetcher, PageFetcher};
pub use parser::parse_page;

use crate::config::{validate_seeds, Config};
use crate::output::CrawlReport;
use crate::url::CrawlUri;
use crate::CrawlerError;

/// Runs a complete crawl over every configured seed
///
/// This is the main entry point used by the binary. It will:
/// 1. Parse the seeds into canonical URIs
/// 2. Build the HTTP fetcher, image cache and transforms from `config`
/// 3. Crawl each seed in order against one claimed-URI set
/// 4. Return the report, stamped with `config_hash` when given
pub async fn run_crawl(
    config: Config,
    config_hash: Option<String>,
) -> Result<CrawlReport, CrawlerError> {
    validate_seeds(&config.seeds)?;

    let seeds = config
        .seeds
        .iter()
        .map(|seed| CrawlUri::parse(seed))
        .collect::<Result<Vec<_>, _>>()?;

    let engine = Engine::from_config(&config)?;
    tracing::info!(
        "Starting crawl of {} seed(s) with {:?} traversal",
        seeds.len(),
        engine.strategy()
    );

    let mut report = engine.crawl_seeds(&seeds).await;
    report.config_hash = config_hash;

    tracing::info!(
        "Crawl complete: {} transformed images from {} pages in {}s",
        report.total_transformed(),
        report.pages_claimed,
        report.duration().num_seconds()
    );

    Ok(report)
}
