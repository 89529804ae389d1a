//! HTML link extraction
//!
//! This module turns a raw response body into candidate URLs:
//! - Resolving the character set from the Content-Type header
//! - Decoding the body and parsing it leniently as HTML
//! - Collecting `<a href="...">` values in document order
//! - Parsing each href into an HTTP(S) `CrawlUrl`

use crate::url::{parse_href_with_encoding, CrawlUrl, HTTP_SCHEMES};
use encoding_rs::{Encoding, UTF_8};
use scraper::{Html, Selector};

/// Resolves the character set declared in a Content-Type header value
///
/// Falls back to UTF-8 when the header is missing, has no `charset` parameter, or names
/// an unknown encoding.
///
/// # Example
///
/// ```
/// use site_crawler::crawler::charset_from_content_type;
///
/// let encoding = charset_from_content_type(Some("text/html; charset=ISO-8859-1"));
/// assert_eq!(encoding.name(), "windows-1252");
/// assert_eq!(charset_from_content_type(None).name(), "UTF-8");
/// ```
pub fn charset_from_content_type(content_type: Option<&str>) -> &'static Encoding {
    content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

fn charset_label(content_type: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets intact
    let start = content_type.to_ascii_lowercase().find("charset=")? + "charset=".len();

    let label = content_type[start..]
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');

    (!label.is_empty()).then_some(label)
}

/// Collects every non-empty `href` of an anchor element, in document order
///
/// Malformed markup never fails: html5ever recovers the same way browsers do.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

/// Extracts candidate URLs from a response body
///
/// # Extraction Rules
///
/// 1. Decode the body with the charset from `content_type` (UTF-8 by default; a byte
///    order mark wins over the header)
/// 2. Collect every non-empty anchor `href`
/// 3. Parse each href on its own, restricted to `http`/`https`; the query is encoded in
///    the page's charset, the path as UTF-8
/// 4. Silently drop hrefs that do not parse (`mailto:`, `javascript:`, fragments, ...)
///
/// The result keeps document order and may contain duplicates. URLs may still be relative;
/// see [`crate::url::normalize_against`].
///
/// # Example
///
/// ```
/// use site_crawler::crawler::extract_links;
///
/// let body = br#"<a href="/a">A</a><a href="mailto:x@y.com">Mail</a>"#;
/// let links = extract_links(body, Some("text/html"));
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].path(), "/a");
/// ```
pub fn extract_links(body: &[u8], content_type: Option<&str>) -> Vec<CrawlUrl> {
    let declared = charset_from_content_type(content_type);
    let (html, encoding, had_errors) = declared.decode(body);

    if had_errors {
        tracing::debug!(
            "Body is not valid {}, malformed sequences replaced",
            encoding.name()
        );
    }

    let query_encoding = encoding.output_encoding();

    extract_hrefs(&html)
        .into_iter()
        .filter_map(
            |href| match parse_href_with_encoding(&href, HTTP_SCHEMES, query_encoding) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::trace!("Dropping href '{}': {}", href, e);
                    None
                }
            },
        )
        .collect()
}
