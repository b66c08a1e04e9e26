//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small site of pages and images and
//! run the real fetcher, image cache and transforms end to end.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use image_ripple::config::{
    Config, CrawlStrategy, CrawlerConfig, ImagesConfig, TintConfig, UserAgentConfig,
};
use image_ripple::crawler::run_crawl;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRANSFORMS: [&str; 3] = ["grayscale", "sepia", "tint"];

fn png(color: [u8; 4]) -> Vec<u8> {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba(color)));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("Failed to encode test image");
    buffer.into_inner()
}

fn create_test_config(
    seed: String,
    max_depth: u32,
    strategy: CrawlStrategy,
    dir: &TempDir,
) -> Config {
    Config {
        seeds: vec![seed],
        crawler: CrawlerConfig {
            max_depth,
            max_concurrent_pages_open: 4,
            strategy,
            same_host_only: true,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        images: ImagesConfig {
            cache_path: dir.path().join("cache").display().to_string(),
            output_path: Some(dir.path().join("out").display().to_string()),
            transforms: TRANSFORMS.iter().map(|t| t.to_string()).collect(),
            tint: TintConfig::default(),
        },
    }
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

async fn mount_png(server: &MockServer, route: &str, color: [u8; 4], expected: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png(color), "image/png"));
    match expected {
        Some(requests) => mock.expect(requests).mount(server).await,
        None => mock.mount(server).await,
    }
}

/// Serves:
/// - `/` linking to `/page1` with images `a.png`, `b.png` and a missing image
/// - `/page1` with image `c.png` and a link back to `/`
///
/// With `expected_image_requests`, each image must be requested exactly that
/// many times before the server is dropped.
async fn start_site(expected_image_requests: Option<u64>) -> MockServer {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<html><body>
        <a href="/page1">Page 1</a>
        <img src="/img/a.png">
        <img src="/img/b.png">
        <img src="/img/missing.png">
        <a href="mailto:someone@example.com">Mail</a>
        </body></html>"#,
    )
    .await;

    mount_html(
        &server,
        "/page1",
        r#"<html><body>
        <img src="/img/c.png">
        <a href="/">Home</a>
        </body></html>"#,
    )
    .await;

    mount_png(&server, "/img/a.png", [255, 0, 0, 255], expected_image_requests).await;
    mount_png(&server, "/img/b.png", [0, 255, 0, 255], expected_image_requests).await;
    mount_png(&server, "/img/c.png", [0, 0, 255, 255], expected_image_requests).await;

    Mock::given(method("GET"))
        .and(path("/img/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    server
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_full_crawl_transforms_every_reachable_image() {
    let server = start_site(Some(1)).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        format!("{}/", server.uri()),
        2,
        CrawlStrategy::Sequential,
        &dir,
    );

    let report = run_crawl(config, Some("hash".to_string()))
        .await
        .expect("Crawl failed");

    assert_eq!(report.total_transformed(), 3 * TRANSFORMS.len());
    assert_eq!(report.pages_claimed, 2);
    assert_eq!(report.config_hash.as_deref(), Some("hash"));

    for transform in TRANSFORMS {
        assert_eq!(count_files(&dir.path().join("out").join(transform)), 3);
    }
    assert_eq!(count_files(&dir.path().join("cache")), 3);
}

#[tokio::test]
async fn test_depth_one_stays_on_seed_page() {
    let server = start_site(None).await;
    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        format!("{}/", server.uri()),
        1,
        CrawlStrategy::Sequential,
        &dir,
    );

    let report = run_crawl(config, None).await.expect("Crawl failed");

    assert_eq!(report.total_transformed(), 2 * TRANSFORMS.len());
    assert_eq!(report.pages_claimed, 1);
}

#[tokio::test]
async fn test_depth_zero_fetches_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        format!("{}/", server.uri()),
        0,
        CrawlStrategy::Sequential,
        &dir,
    );

    let report = run_crawl(config, None).await.expect("Crawl failed");

    assert_eq!(report.total_transformed(), 0);
    assert_eq!(report.pages_claimed, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_strategy_matches_sequential() {
    let sequential_server = start_site(Some(1)).await;
    let sequential_dir = TempDir::new().unwrap();
    let sequential = run_crawl(
        create_test_config(
            format!("{}/", sequential_server.uri()),
            2,
            CrawlStrategy::Sequential,
            &sequential_dir,
        ),
        None,
    )
    .await
    .expect("Sequential crawl failed");

    let concurrent_server = start_site(Some(1)).await;
    let concurrent_dir = TempDir::new().unwrap();
    let concurrent = run_crawl(
        create_test_config(
            format!("{}/", concurrent_server.uri()),
            2,
            CrawlStrategy::Concurrent,
            &concurrent_dir,
        ),
        None,
    )
    .await
    .expect("Concurrent crawl failed");

    assert_eq!(concurrent.total_transformed(), sequential.total_transformed());
    assert_eq!(concurrent.pages_claimed, sequential.pages_claimed);
}

#[tokio::test]
async fn test_second_run_uses_image_cache() {
    // Each image may be downloaded once across both runs
    let server = start_site(Some(1)).await;
    let dir = TempDir::new().unwrap();

    let first = run_crawl(
        create_test_config(format!("{}/", server.uri()), 2, CrawlStrategy::Sequential, &dir),
        None,
    )
    .await
    .expect("First crawl failed");

    let second = run_crawl(
        create_test_config(format!("{}/", server.uri()), 2, CrawlStrategy::Sequential, &dir),
        None,
    )
    .await
    .expect("Second crawl failed");

    assert_eq!(first.total_transformed(), second.total_transformed());
    server.verify().await;
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_report() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        "http://127.0.0.1:9/".to_string(),
        3,
        CrawlStrategy::Sequential,
        &dir,
    );

    let report = run_crawl(config, None).await.expect("Crawl failed");

    assert_eq!(report.total_transformed(), 0);
    assert_eq!(report.pages_claimed, 1);
    assert_eq!(report.seeds.len(), 1);
}

#[tokio::test]
async fn test_invalid_transform_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(
        "http://127.0.0.1:9/".to_string(),
        1,
        CrawlStrategy::Sequential,
        &dir,
    );
    config.images.transforms.push("emboss".to_string());

    assert!(run_crawl(config, None).await.is_err());
}
