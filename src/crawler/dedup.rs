//! Visited-URI registry shared by every branch of a crawl

use crate::url::CrawlUri;
use dashmap::DashSet;

/// Concurrency-safe set of claimed URIs
///
/// A URI is claimed by the first caller of [`UriSet::try_claim`]; every later
/// caller, on any thread, sees `false`. Claims are never released.
#[derive(Debug, Default)]
pub struct UriSet {
    claimed: DashSet<String>,
}

impl UriSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically registers `uri`, returning true only for the first claim
    pub fn try_claim(&self, uri: &CrawlUri) -> bool {
        self.claimed.insert(uri.as_str().to_owned())
    }

    pub fn contains(&self, uri: &CrawlUri) -> bool {
        self.claimed.contains(uri.as_str())
    }

    /// Number of URIs claimed so far
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
