//! Fetched pages and the typed elements they expose
//!
//! A [`Page`] is produced by a [`PageFetcher`](crate::crawler::PageFetcher)
//! and consumed by exactly one crawl step, which walks its elements once.

use crate::url::CrawlUri;
use std::fmt;

/// Classification of a reference found on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A link to another page that may be crawled
    Page,
    /// A reference to an image resource
    Image,
}

impl ElementKind {
    /// Both kinds, in the order the crawler requests them
    pub const ALL: [ElementKind; 2] = [ElementKind::Page, ElementKind::Image];
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Image => write!(f, "image"),
        }
    }
}

/// A typed reference found on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageElement {
    Page(CrawlUri),
    Image(CrawlUri),
}

impl PageElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Page(_) => ElementKind::Page,
            Self::Image(_) => ElementKind::Image,
        }
    }

    /// The URI this element points at
    pub fn target(&self) -> &CrawlUri {
        match self {
            Self::Page(uri) | Self::Image(uri) => uri,
        }
    }
}

/// A fetched and parsed page
#[derive(Debug, Clone)]
pub struct Page {
    uri: CrawlUri,
    elements: Vec<PageElement>,
}

impl Page {
    /// Creates a page from the elements found on it, in document order
    pub fn new(uri: CrawlUri, elements: Vec<PageElement>) -> Self {
        Self { uri, elements }
    }

    pub fn uri(&self) -> &CrawlUri {
        &self.uri
    }

    /// Consumes the page, yielding the elements of the requested kinds
    ///
    /// The returned iterator is single-pass and filters lazily; duplicates
    /// present on the page are yielded as-is.
    pub fn elements(self, kinds: &[ElementKind]) -> PageElements {
        PageElements {
            inner: self.elements.into_iter(),
            wants_pages: kinds.contains(&ElementKind::Page),
            wants_images: kinds.contains(&ElementKind::Image),
        }
    }
}

/// Lazy, single-pass sequence of page elements
#[derive(Debug)]
pub struct PageElements {
    inner: std::vec::IntoIter<PageElement>,
    wants_pages: bool,
    wants_images: bool,
}

impl PageElements {
    fn wanted(&self, element: &PageElement) -> bool {
        match element.kind() {
            ElementKind::Page => self.wants_pages,
            ElementKind::Image => self.wants_images,
        }
    }
}

impl Iterator for PageElements {
    type Item = PageElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let element = self.inner.next()?;
            if self.wanted(&element) {
                return Some(element);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
