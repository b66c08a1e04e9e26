//! Crawl report and console printing

use crate::config::CrawlStrategy;
use crate::url::CrawlUri;
use chrono::{DateTime, Duration, Utc};

/// Result of crawling one seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOutcome {
    pub seed: CrawlUri,
    /// Transformed images produced by the crawl from this seed
    pub transformed: usize,
}

/// Summary of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Hash of the configuration file, when the run was started from one
    pub config_hash: Option<String>,
    pub max_depth: u32,
    pub strategy: CrawlStrategy,
    /// One entry per seed, in crawl order
    pub seeds: Vec<SeedOutcome>,
    /// Distinct pages claimed across every seed
    pub pages_claimed: usize,
}

impl CrawlReport {
    pub fn total_transformed(&self) -> usize {
        self.seeds.iter().map(|outcome| outcome.transformed).sum()
    }

    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Started:  {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!(
        "  Duration: {:.1}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    if let Some(hash) = &report.config_hash {
        println!("  Config hash: {}", hash);
    }
    println!("  Max depth: {}", report.max_depth);
    println!("  Strategy: {:?}", report.strategy);
    println!();

    println!("Seeds:");
    for outcome in &report.seeds {
        println!("  {} -> {} transformed", outcome.seed, outcome.transformed);
    }
    println!();

    println!("Pages claimed: {}", report.pages_claimed);
    println!("Transformed images: {}", report.total_transformed());
}
