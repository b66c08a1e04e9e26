//! Depth-bounded recursive crawl
//!
//! The engine walks the page graph from a seed, claiming each page in the
//! shared [`UriSet`] before fetching it, and sends every image reference
//! through the [`ImagePipeline`]. The result of a crawl is the number of
//! transformed images produced.

use crate::config::{Config, CrawlStrategy};
use crate::crawler::fetcher::{build_http_client, HttpPageFetcher, PageFetcher};
use crate::crawler::UriSet;
use crate::output::{CrawlReport, SeedOutcome};
use crate::page::{ElementKind, Page, PageElement};
use crate::pipeline::{ImageCache, ImagePipeline};
use crate::transform::{LocalTransformer, TransformService};
use crate::url::CrawlUri;
use crate::CrawlerError;
use chrono::Utc;
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Recursive crawler over injected fetch and image capabilities
///
/// Clones share the claimed-URI set and the in-flight limit.
#[derive(Clone)]
pub struct Engine {
    fetcher: Arc<dyn PageFetcher>,
    pipeline: ImagePipeline,
    uris: Arc<UriSet>,
    max_depth: u32,
    strategy: CrawlStrategy,
    concurrency: usize,
    /// Crawl-wide limit on page fetches and image jobs in flight
    permits: Arc<Semaphore>,
}

impl Engine {
    /// Creates a sequential engine
    ///
    /// `max_depth` counts the seed as depth 1, so 0 crawls nothing.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        pipeline: ImagePipeline,
        uris: Arc<UriSet>,
        max_depth: u32,
    ) -> Self {
        Self {
            fetcher,
            pipeline,
            uris,
            max_depth,
            strategy: CrawlStrategy::Sequential,
            concurrency: 1,
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Sets the traversal strategy and how many page fetches and image jobs
    /// may be in flight at once across the whole crawl
    pub fn with_strategy(mut self, strategy: CrawlStrategy, concurrency: usize) -> Self {
        self.strategy = strategy;
        self.concurrency = concurrency.max(1);
        self.permits = Arc::new(Semaphore::new(self.concurrency));
        self
    }

    /// Wires the HTTP fetcher, image cache and local transforms from `config`
    pub fn from_config(config: &Config) -> Result<Self, CrawlerError> {
        let client = build_http_client(&config.user_agent)?;

        let fetcher = HttpPageFetcher::new(client.clone(), config.crawler.same_host_only);
        let cache = ImageCache::new(client, &config.images.cache_path);

        let service = Arc::new(TransformService::with_image_ops(config.images.tint.into()));
        let mut transformer = LocalTransformer::new(service, config.images.transforms.clone())?;
        if let Some(output_path) = &config.images.output_path {
            transformer = transformer.with_output_dir(output_path);
        }

        let pipeline = ImagePipeline::new(Arc::new(cache), Arc::new(transformer));

        Ok(Self::new(
            Arc::new(fetcher),
            pipeline,
            Arc::new(UriSet::new()),
            config.crawler.max_depth,
        )
        .with_strategy(
            config.crawler.strategy,
            config.crawler.max_concurrent_pages_open as usize,
        ))
    }

    /// The set of pages claimed by this engine
    pub fn uris(&self) -> &Arc<UriSet> {
        &self.uris
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn strategy(&self) -> CrawlStrategy {
        self.strategy
    }

    /// Crawls from `seed`, returning the number of transformed images
    pub async fn crawl(&self, seed: &CrawlUri) -> usize {
        tracing::info!("Crawling from {} (max depth {})", seed, self.max_depth);
        let total = self.perform_crawl(seed.clone(), 1).await;
        tracing::info!("Crawl from {} produced {} transformed images", seed, total);
        total
    }

    /// Crawls each seed in turn against the same claimed-URI set
    pub async fn crawl_seeds(&self, seeds: &[CrawlUri]) -> CrawlReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let transformed = self.crawl(seed).await;
            outcomes.push(SeedOutcome {
                seed: seed.clone(),
                transformed,
            });
        }

        CrawlReport {
            started_at,
            finished_at: Utc::now(),
            config_hash: None,
            max_depth: self.max_depth,
            strategy: self.strategy,
            seeds: outcomes,
            pages_claimed: self.uris.len(),
        }
    }

    /// Crawls `uri` found at `depth`
    ///
    /// Boxed because it recurses through [`Engine::process_element`].
    pub fn perform_crawl<'a>(&'a self, uri: CrawlUri, depth: u32) -> BoxFuture<'a, usize> {
        async move {
            if depth > self.max_depth {
                tracing::debug!("Skipping {}: depth {} exceeds {}", uri, depth, self.max_depth);
                return 0;
            }

            if !self.uris.try_claim(&uri) {
                tracing::debug!("Skipping {}: already claimed", uri);
                return 0;
            }

            // The permit covers the fetch only, never the recursion below
            let fetched = match self.permits.acquire().await {
                Ok(_permit) => self.fetcher.fetch_page(&uri).await,
                Err(_) => return 0,
            };
            let page = match fetched {
                Some(page) => page,
                None => {
                    tracing::debug!("Skipping {}: fetch failed", uri);
                    return 0;
                }
            };

            let total = self.process_page(page, depth).await;
            tracing::info!("Page {} at depth {} produced {} transformed images", uri, depth, total);
            total
        }
        .boxed()
    }

    /// Child pages are always crawled in document order, so both strategies
    /// claim the same pages at the same depths. The concurrent strategy
    /// overlaps that walk with the page's image jobs.
    async fn process_page(&self, page: Page, depth: u32) -> usize {
        match self.strategy {
            CrawlStrategy::Sequential => {
                let mut total = 0;
                for element in page.elements(&ElementKind::ALL) {
                    total += match element {
                        PageElement::Page(target) => self.perform_crawl(target, depth + 1).await,
                        PageElement::Image(target) => self.process_image(target).await,
                    };
                }
                total
            }
            CrawlStrategy::Concurrent => {
                let mut pages = Vec::new();
                let mut images = Vec::new();
                for element in page.elements(&ElementKind::ALL) {
                    match element {
                        PageElement::Page(target) => pages.push(target),
                        PageElement::Image(target) => images.push(target),
                    }
                }

                let children = async {
                    let mut total = 0;
                    for target in pages {
                        total += self.perform_crawl(target, depth + 1).await;
                    }
                    total
                };

                let images = stream::iter(images)
                    .map(|target| self.process_image(target))
                    .buffer_unordered(self.concurrency)
                    .fold(0, |total, count| async move { total + count });

                let (from_children, from_images) = future::join(children, images).await;
                from_children + from_images
            }
        }
    }

    async fn process_image(&self, target: CrawlUri) -> usize {
        match self.permits.acquire().await {
            Ok(_permit) => self.pipeline.process_image(&target).await,
            Err(_) => 0,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("max_depth", &self.max_depth)
            .field("strategy", &self.strategy)
            .field("concurrency", &self.concurrency)
            .field("available_permits", &self.permits.available_permits())
            .field("pages_claimed", &self.uris.len())
            .finish()
    }
}
