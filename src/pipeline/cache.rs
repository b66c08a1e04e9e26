//! Content-addressed on-disk image cache with download on miss

use crate::pipeline::{ImageSource, RawImage};
use crate::url::CrawlUri;
use crate::CrawlerError;
use async_trait::async_trait;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Extension used for cached images whose URI has none
const FALLBACK_EXTENSION: &str = "img";

/// Hex-encoded SHA-256 of the canonical URI
pub fn cache_key(uri: &CrawlUri) -> String {
    let mut hasher = Sha256::new();
    hasher.update(uri.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Image source that serves from a cache directory and downloads on a miss
#[derive(Debug)]
pub struct ImageCache {
    client: Client,
    cache_dir: PathBuf,
    writes: AtomicU64,
}

impl ImageCache {
    pub fn new(client: Client, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            cache_dir: cache_dir.into(),
            writes: AtomicU64::new(0),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Where the cached copy of `uri` lives
    pub fn cache_path(&self, uri: &CrawlUri) -> PathBuf {
        let extension = uri
            .extension()
            .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
        self.cache_dir
            .join(format!("{}.{}", cache_key(uri), extension))
    }

    /// Removes every cached image
    pub async fn clear(&self) -> io::Result<()> {
        clear_cache_dir(&self.cache_dir).await
    }

    async fn read_cached(&self, path: &Path) -> Option<Vec<u8>> {
        match tokio::fs::read(path).await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            _ => None,
        }
    }

    async fn download(&self, uri: &CrawlUri) -> Result<Vec<u8>, CrawlerError> {
        let response = self
            .client
            .get(uri.as_str())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| CrawlerError::Http {
                url: uri.to_string(),
                source,
            })?;

        let bytes = response.bytes().await.map_err(|source| CrawlerError::Http {
            url: uri.to_string(),
            source,
        })?;

        if bytes.is_empty() {
            return Err(CrawlerError::EmptyBody {
                url: uri.to_string(),
            });
        }

        Ok(bytes.to_vec())
    }

    /// Writes through a uniquely named temporary file so readers never see
    /// a partially written image
    async fn store(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let sequence = self.writes.fetch_add(1, Ordering::Relaxed);
        let temp_path = path.with_extension(format!("{}.part", sequence));
        tokio::fs::write(&temp_path, bytes).await?;

        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl ImageSource for ImageCache {
    async fn get_or_download_image(&self, uri: &CrawlUri) -> Option<RawImage> {
        let path = self.cache_path(uri);

        if let Some(bytes) = self.read_cached(&path).await {
            tracing::trace!("Cache hit for {}", uri);
            return Some(RawImage::new(uri.clone(), bytes));
        }

        let bytes = match self.download(uri).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to download image: {}", e);
                return None;
            }
        };

        if let Err(e) = self.store(&path, &bytes).await {
            tracing::warn!("Failed to cache {} at {}: {}", uri, path.display(), e);
        }

        Some(RawImage::new(uri.clone(), bytes))
    }
}

/// Empties (or creates) a cache directory
pub async fn clear_cache_dir(dir: &Path) -> io::Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    tokio::fs::create_dir_all(dir).await
}
