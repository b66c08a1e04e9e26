use serde::Deserialize;

/// Main configuration structure for Image-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// URLs to start crawling from
    #[serde(default)]
    pub seeds: Vec<String>,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub images: ImagesConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl, counting the seed page as depth 1
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of elements of one page processed at the same time
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// How the elements of a page are traversed
    #[serde(default)]
    pub strategy: CrawlStrategy,

    /// Only follow page links on the host of the page they appear on
    #[serde(rename = "same-host-only", default = "default_same_host_only")]
    pub same_host_only: bool,
}

fn default_same_host_only() -> bool {
    true
}

/// Traversal strategy for the elements of a fetched page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStrategy {
    /// Depth-first, one element at a time
    #[default]
    Sequential,
    /// Elements of a page processed as a bounded concurrent stream
    Concurrent,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Image download and transform configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Directory holding downloaded images
    #[serde(rename = "cache-path")]
    pub cache_path: String,

    /// Directory receiving transformed images (not written when absent)
    #[serde(rename = "output-path", default)]
    pub output_path: Option<String>,

    /// Transform identifiers applied to every image
    #[serde(default = "default_transforms")]
    pub transforms: Vec<String>,

    /// Channel factors for the tint transform
    #[serde(default)]
    pub tint: TintConfig,
}

fn default_transforms() -> Vec<String> {
    vec![
        "grayscale".to_string(),
        "sepia".to_string(),
        "tint".to_string(),
    ]
}

/// Per-channel multipliers for the tint transform
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TintConfig {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            red: 0.2,
            green: 0.5,
            blue: 0.7,
        }
    }
}
