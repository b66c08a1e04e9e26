//! URL handling module for Image-Ripple
//!
//! This module provides URL normalization and the [`CrawlUri`] type used as the
//! identity of every page and image in a crawl.

mod normalize;

use crate::UrlResult;
use std::fmt;
use std::str::FromStr;
use url::Url;

pub use normalize::normalize_url;

/// A normalized http(s) URL identifying a page or image resource
///
/// Two `CrawlUri`s compare equal exactly when their canonical strings are
/// equal, which is what the visited set keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlUri(Url);

impl CrawlUri {
    /// Parses and normalizes a URL string
    ///
    /// # Examples
    ///
    /// ```
    /// use image_ripple::url::CrawlUri;
    ///
    /// let a = CrawlUri::parse("https://EXAMPLE.com/gallery?b=2&a=1#top").unwrap();
    /// let b = CrawlUri::parse("https://example.com/gallery?a=1&b=2").unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn parse(url_str: &str) -> UrlResult<Self> {
        normalize_url(url_str).map(Self)
    }

    /// Normalizes an already-parsed URL
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        Self::parse(url.as_str())
    }

    /// The canonical string form
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The (lowercase) host of this URI
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns true if both URIs point at the same host and port
    pub fn same_origin_host(&self, other: &CrawlUri) -> bool {
        self.0.host_str() == other.0.host_str() && self.0.port() == other.0.port()
    }

    /// The last non-empty path segment, if any
    pub fn file_name(&self) -> Option<&str> {
        self.0
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
    }

    /// The lowercase extension of the last path segment, if any
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

impl fmt::Display for CrawlUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrawlUri {
    type Err = crate::UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CrawlUri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
