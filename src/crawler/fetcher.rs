//! HTTP page fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Error classification
//! - Turning fetched HTML into a [`Page`]

use crate::config::UserAgentConfig;
use crate::crawler::parser::parse_page;
use crate::page::Page;
use crate::url::CrawlUri;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Capability to fetch and parse the page at a URI
///
/// Failures (network, status, content type) are reported as `None` and are
/// never escalated to the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, uri: &CrawlUri) -> Option<Page>;
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use image_ripple::config::UserAgentConfig;
/// use image_ripple::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "ImageRipple".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML content type | Success |
/// | 2xx with other content type | ContentMismatch |
/// | Any other status | HttpError |
/// | Timeout / connect / body error | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if !is_html_content_type(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

/// Fetches pages over HTTP and extracts their page and image elements
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    same_host_only: bool,
}

impl HttpPageFetcher {
    /// Creates a fetcher
    ///
    /// With `same_host_only`, links to pages on other hosts are dropped from
    /// fetched pages; images are kept regardless of host.
    pub fn new(client: Client, same_host_only: bool) -> Self {
        Self {
            client,
            same_host_only,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, uri: &CrawlUri) -> Option<Page> {
        match fetch_url(&self.client, uri.as_str()).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::trace!("Fetched {} (HTTP {})", final_url, status_code);
                Some(parse_page(&body, uri, &final_url, self.same_host_only))
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {}: expected HTML, got '{}'", uri, content_type);
                None
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to fetch {}: HTTP {}", uri, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", uri, error);
                None
            }
        }
    }
}
