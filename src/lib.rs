//! Image-Ripple: a depth-bounded image crawler
//!
//! This crate crawls pages reachable from a seed URL, visits each page at most
//! once, and runs every discovered image through a download, cache and
//! transform pipeline, reporting how many transformed images were produced.

pub mod config;
pub mod crawler;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod transform;
pub mod url;

use thiserror::Error;

/// Main error type for Image-Ripple operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Empty response body from {url}")]
    EmptyBody { url: String },

    #[error("Transform error: {0}")]
    Transform(#[from] transform::TransformError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown transform '{0}'")]
    UnknownTransform(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Image-Ripple operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Engine, UriSet};
pub use page::{ElementKind, Page, PageElement};
pub use pipeline::{ImagePipeline, RawImage};
pub use transform::{TransformService, TransformedImage};
pub use url::{normalize_url, CrawlUri};
