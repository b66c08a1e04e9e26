//! Per-image acquire, transform and count pipeline
//!
//! [`ImagePipeline`] glues two capabilities together:
//! - an [`ImageSource`] that returns a cached or freshly downloaded image
//! - an [`ImageTransformer`] that applies the configured transforms and
//!   reports how many produced output

mod cache;

pub use cache::{cache_key, clear_cache_dir, ImageCache};

use crate::url::CrawlUri;
use async_trait::async_trait;
use std::sync::Arc;

/// Downloaded image bytes and where they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub uri: CrawlUri,
    /// Human-readable name, the last path segment of the URI when it has one
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawImage {
    pub fn new(uri: CrawlUri, bytes: Vec<u8>) -> Self {
        let name = uri
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| cache_key(&uri)[..16].to_string());

        Self { uri, name, bytes }
    }

    /// File name for a transformed copy of this image
    ///
    /// Includes a prefix of the URI's cache key so that images sharing a file
    /// name on different paths do not overwrite each other.
    pub fn output_file_name(&self) -> String {
        let stem = self
            .name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(&self.name);
        format!("{}-{}.png", stem, &cache_key(&self.uri)[..12])
    }
}

/// Capability to obtain an image, from cache or by downloading it
///
/// A failed acquisition is reported as `None`.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn get_or_download_image(&self, uri: &CrawlUri) -> Option<RawImage>;
}

/// Capability to apply every configured transform to an image
///
/// Returns how many transforms produced non-empty output.
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    async fn transform_image(&self, image: &RawImage) -> usize;
}

/// Acquires an image and runs it through the transform stage
#[derive(Clone)]
pub struct ImagePipeline {
    source: Arc<dyn ImageSource>,
    transformer: Arc<dyn ImageTransformer>,
}

impl ImagePipeline {
    pub fn new(source: Arc<dyn ImageSource>, transformer: Arc<dyn ImageTransformer>) -> Self {
        Self {
            source,
            transformer,
        }
    }

    /// Returns the number of transformed variants produced for `uri`
    ///
    /// When the image cannot be acquired the transform stage is skipped and
    /// the result is 0.
    pub async fn process_image(&self, uri: &CrawlUri) -> usize {
        let image = match self.source.get_or_download_image(uri).await {
            Some(image) => image,
            None => {
                tracing::debug!("No image available for {}", uri);
                return 0;
            }
        };

        let transformed = self.transformer.transform_image(&image).await;
        tracing::debug!("Image {} produced {} transformed variants", uri, transformed);
        transformed
    }
}
