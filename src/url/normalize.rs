use crate::UrlError;
use url::Url;

/// Query parameters that only carry click or campaign tracking
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "msclkid", "mc_eid", "ref"];

/// Canonicalizes a page or image URL
///
/// - only `http` and `https` with a non-empty host are accepted
/// - the host is lowercased; scheme, port and path case are kept
/// - `.`/`..` segments and repeated slashes are removed from the path, an
///   empty path becomes `/` and a trailing slash is kept
/// - the fragment is dropped
/// - tracking parameters (`utm_*` and [`TRACKING_PARAMS`]) are dropped and
///   the rest are sorted by key then value; an empty query is removed
///
/// `www.` is not stripped since the canonical URL is the one that is fetched.
///
/// # Examples
///
/// ```
/// use image_ripple::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM//gallery/#photos").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/gallery/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
        _ => return Err(UrlError::MissingHost),
    };
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    let path = canonical_path(url.path());
    url.set_path(&path);
    url.set_fragment(None);

    let query = canonical_query(&url);
    url.set_query(query.as_deref());

    Ok(url)
}

fn canonical_path(path: &str) -> String {
    let segments = path.split('/').fold(Vec::new(), |mut kept, segment| {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            _ => kept.push(segment),
        }
        kept
    });

    if segments.is_empty() {
        return "/".to_string();
    }

    let trailing = if path.ends_with('/') { "/" } else { "" };
    format!("/{}{}", segments.join("/"), trailing)
}

/// Sorted, tracking-free query string, or `None` when nothing is left
fn canonical_query(url: &Url) -> Option<String> {
    url.query()?;

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&&**key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if pairs.is_empty() {
        return None;
    }
    pairs.sort();

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Some(query)
}
