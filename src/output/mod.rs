//! Output module for crawl reports
//!
//! This module handles:
//! - The [`CrawlReport`] produced by a crawl run
//! - Printing reports to the console
//! - Writing markdown reports

mod markdown;
mod report;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{print_report, CrawlReport, SeedOutcome};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
