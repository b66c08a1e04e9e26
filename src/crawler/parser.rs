//! HTML parser for extracting page and image elements
//!
//! This module turns fetched HTML into a [`Page`] whose elements are tagged
//! as sub-pages to crawl or images to run through the pipeline.

use crate::page::{Page, PageElement};
use crate::url::CrawlUri;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// File extensions recognized as images when linked from an anchor
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Parses HTML content and classifies every outbound reference
///
/// # Extraction Rules
///
/// **Page elements:**
/// - `<a href="...">` tags, unless the target has an image extension
///
/// **Image elements:**
/// - `<img src="...">` tags
/// - `<a href="...">` tags whose target has an image extension
///
/// **Excluded:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links
/// - Anything that does not resolve to an HTTP(S) URL
/// - With `same_host_only`, page links to a different host or port than `base_url`
///
/// Elements are returned in document order and are not deduplicated.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_uri` - The URI the page was requested as
/// * `base_url` - The URL for resolving relative links (after redirects)
/// * `same_host_only` - Whether to drop page links to other hosts
///
/// # Example
///
/// ```
/// use image_ripple::crawler::parse_page;
/// use image_ripple::page::ElementKind;
/// use image_ripple::url::CrawlUri;
///
/// let html = r#"<html><body><a href="/next">Next</a><img src="cat.png"></body></html>"#;
/// let uri = CrawlUri::parse("https://example.com/").unwrap();
/// let page = parse_page(html, &uri, uri.as_url(), true);
/// assert_eq!(page.elements(&[ElementKind::Image]).count(), 1);
/// ```
pub fn parse_page(html: &str, page_uri: &CrawlUri, base_url: &Url, same_host_only: bool) -> Page {
    let document = Html::parse_document(html);
    let elements = extract_elements(&document, base_url, same_host_only);
    Page::new(page_uri.clone(), elements)
}

/// Extracts all valid elements from the HTML document in document order
fn extract_elements(document: &Html, base_url: &Url, same_host_only: bool) -> Vec<PageElement> {
    let mut elements = Vec::new();
    let origin = if same_host_only {
        CrawlUri::from_url(base_url).ok()
    } else {
        None
    };

    let selector = match Selector::parse("a[href], img[src]") {
        Ok(selector) => selector,
        Err(_) => return elements,
    };

    for element in document.select(&selector) {
        if let Some(page_element) = classify(element, base_url, origin.as_ref()) {
            elements.push(page_element);
        }
    }

    elements
}

/// Classifies a single `<a>` or `<img>` element
/// With `origin`, page links to any other host or port are dropped
fn classify(
    element: ElementRef<'_>,
    base_url: &Url,
    origin: Option<&CrawlUri>,
) -> Option<PageElement> {
    let value = element.value();

    match value.name() {
        "img" => {
            let target = resolve_link(value.attr("src")?, base_url)?;
            Some(PageElement::Image(target))
        }
        "a" => {
            if value.attr("download").is_some() {
                return None;
            }

            let target = resolve_link(value.attr("href")?, base_url)?;

            if is_image_uri(&target) {
                return Some(PageElement::Image(target));
            }

            if origin.is_some_and(|origin| !target.same_origin_host(origin)) {
                tracing::trace!("Dropping off-host link {}", target);
                return None;
            }

            Some(PageElement::Page(target))
        }
        _ => None,
    }
}

fn is_image_uri(uri: &CrawlUri) -> bool {
    uri.extension()
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Resolves a link href to a normalized URI
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<CrawlUri> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    CrawlUri::from_url(&absolute_url).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ElementKind;

    fn page_uri() -> CrawlUri {
        CrawlUri::parse("https://example.com/page").unwrap()
    }

    fn parse(html: &str) -> Vec<PageElement> {
        let uri = page_uri();
        parse_page(html, &uri, uri.as_url(), true)
            .elements(&ElementKind::ALL)
            .collect()
    }

    fn targets(elements: &[PageElement]) -> Vec<&str> {
        elements.iter().map(|e| e.target().as_str()).collect()
    }

    #[test]
    fn test_extract_absolute_link() {
        let elements = parse(r#"<html><body><a href="https://example.com/other">Link</a></body></html>"#);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::Page);
        assert_eq!(targets(&elements), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_link() {
        let elements = parse(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(targets(&elements), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let elements = parse(r#"<html><body><a href="other">Link</a></body></html>"#);
        assert_eq!(targets(&elements), vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_image() {
        let elements = parse(r#"<html><body><img src="/img/cat.png"></body></html>"#);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::Image);
        assert_eq!(targets(&elements), vec!["https://example.com/img/cat.png"]);
    }

    #[test]
    fn test_anchor_to_image_is_image() {
        let elements = parse(r#"<html><body><a href="/full/Cat.JPG">Full size</a></body></html>"#);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind(), ElementKind::Image);
    }

    #[test]
    fn test_off_host_image_is_kept() {
        let elements = parse(r#"<html><body><img src="https://cdn.other.com/a.png"></body></html>"#);
        assert_eq!(targets(&elements), vec!["https://cdn.other.com/a.png"]);
    }

    #[test]
    fn test_off_host_page_dropped_when_same_host_only() {
        let elements = parse(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert!(elements.is_empty());
    }

    #[test]
    fn test_other_port_is_another_host() {
        let uri = CrawlUri::parse("http://127.0.0.1:8080/").unwrap();
        let html = r#"<html><body>
            <a href="http://127.0.0.1:8080/next">Same</a>
            <a href="http://127.0.0.1:9090/next">Other port</a>
            </body></html>"#;
        let elements: Vec<_> = parse_page(html, &uri, uri.as_url(), true)
            .elements(&ElementKind::ALL)
            .collect();
        assert_eq!(targets(&elements), vec!["http://127.0.0.1:8080/next"]);
    }

    #[test]
    fn test_off_host_page_kept_when_any_host() {
        let uri = page_uri();
        let html = r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#;
        let elements: Vec<_> = parse_page(html, &uri, uri.as_url(), false)
            .elements(&ElementKind::ALL)
            .collect();
        assert_eq!(targets(&elements), vec!["https://other.com/page"]);
    }

    #[test]
    fn test_document_order_and_duplicates() {
        let elements = parse(
            r#"
            <html>
            <body>
                <a href="/p1">P1</a>
                <img src="/a.png">
                <img src="/a.png">
                <a href="/p2">P2</a>
            </body>
            </html>
        "#,
        );
        let kinds: Vec<_> = elements.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Page,
                ElementKind::Image,
                ElementKind::Image,
                ElementKind::Page
            ]
        );
    }

    #[test]
    fn test_skip_special_schemes() {
        let elements = parse(
            r#"
            <html>
            <body>
                <a href="javascript:void(0)">JS</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>Test</h1>">Data</a>
                <img src="data:image/png;base64,AAAA">
            </body>
            </html>
        "#,
        );
        assert!(elements.is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let elements = parse(r#"<html><body><a href="/file.pdf" download>Download</a></body></html>"#);
        assert!(elements.is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let elements = parse(r##"<html><body><a href="#section">Jump</a></body></html>"##);
        assert!(elements.is_empty());
    }

    #[test]
    fn test_skip_empty_src() {
        let elements = parse(r#"<html><body><img src=""><a href="  ">x</a></body></html>"#);
        assert!(elements.is_empty());
    }

    #[test]
    fn test_relative_links_resolve_against_base_url() {
        let uri = page_uri();
        let redirected = Url::parse("https://example.com/gallery/").unwrap();
        let html = r#"<html><body><img src="one.gif"></body></html>"#;
        let elements: Vec<_> = parse_page(html, &uri, &redirected, true)
            .elements(&ElementKind::ALL)
            .collect();
        assert_eq!(targets(&elements), vec!["https://example.com/gallery/one.gif"]);
    }
}
