use crate::url::CrawlUrl;

/// Normalizes a discovered URL against the crawl seed
///
/// # Normalization Steps
///
/// 1. A missing scheme is taken from the seed
/// 2. A missing host is taken from the seed, together with the seed's port
///
/// Path and query are never touched, and a URL that already has a scheme or host keeps it.
///
/// # Examples
///
/// ```
/// use site_crawler::url::{normalize_against, parse_href, CrawlUrl, HTTP_SCHEMES};
///
/// let seed = CrawlUrl::parse_absolute("https://example.com/").unwrap();
/// let link = parse_href("/a?b=c", HTTP_SCHEMES).unwrap();
/// assert_eq!(
///     normalize_against(&link, &seed).to_string(),
///     "https://example.com/a?b=c"
/// );
/// ```
pub fn normalize_against(url: &CrawlUrl, seed: &CrawlUrl) -> CrawlUrl {
    let mut normalized = url.clone();

    if normalized.scheme().is_none() {
        normalized = normalized.with_scheme(seed.scheme());
    }

    if normalized.host().is_none() {
        normalized = normalized
            .with_host(seed.host())
            .with_port(seed.port());
    }

    normalized
}
