use crate::url::CrawlUrl;
use crate::UrlError;
use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use url::Url;

/// The only schemes the crawler follows
pub const HTTP_SCHEMES: &[&str] = &["http", "https"];

/// Placeholder base for resolving references that carry neither scheme nor host.
/// Only the resulting path and query are kept.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Parses an href into a `CrawlUrl`, restricted to the given schemes
///
/// # Parsing Rules
///
/// 1. Surrounding whitespace and any `#fragment` are removed
/// 2. An empty reference (including a fragment-only one) is rejected
/// 3. A reference with a scheme must use one of `allowed_schemes` and resolve to a host;
///    slashes after the scheme are forgiven the way browsers forgive them (`https:/a.com`)
/// 4. `//host/path` keeps its host but has no scheme
/// 5. Anything else is resolved from the site root: only path and query are set
///
/// Paths are percent-encoded as UTF-8. Queries are percent-encoded as UTF-8 too; use
/// [`parse_href_with_encoding`] to encode them in the document's character set.
///
/// # Examples
///
/// ```
/// use site_crawler::url::{parse_href, HTTP_SCHEMES};
///
/// let url = parse_href("/a?b=c", HTTP_SCHEMES).unwrap();
/// assert_eq!(url.scheme(), None);
/// assert_eq!(url.path(), "/a");
/// assert_eq!(url.query(), Some("b=c"));
///
/// assert!(parse_href("mailto:x@y.com", HTTP_SCHEMES).is_err());
/// ```
pub fn parse_href(raw: &str, allowed_schemes: &[&str]) -> Result<CrawlUrl, UrlError> {
    parse_href_with_encoding(raw, allowed_schemes, UTF_8)
}

/// Parses an href like [`parse_href`], percent-encoding the query in `query_encoding`
///
/// Browsers submit the query of a link in the encoding of the page it was found on, so a
/// `windows-1252` page linking to `?q=é` requests `?q=%E9`.
pub fn parse_href_with_encoding(
    raw: &str,
    allowed_schemes: &[&str],
    query_encoding: &'static Encoding,
) -> Result<CrawlUrl, UrlError> {
    let reference = strip_fragment(raw.trim());
    if reference.is_empty() {
        return Err(UrlError::Parse("empty reference".to_string()));
    }

    if let Some(scheme) = split_scheme(reference) {
        let scheme = scheme.to_ascii_lowercase();
        if !allowed_schemes.contains(&scheme.as_str()) {
            return Err(UrlError::InvalidScheme(scheme));
        }

        let url = parse_with(reference, None, query_encoding)?;
        return from_absolute(&url, true);
    }

    if reference.starts_with("//") {
        // Parse under a temporary scheme and drop it again
        let url = parse_with(&format!("http:{}", reference), None, query_encoding)?;
        return from_absolute(&url, false);
    }

    let base = Url::parse(RELATIVE_BASE).map_err(|e| UrlError::Parse(e.to_string()))?;
    let url = parse_with(reference, Some(&base), query_encoding)?;
    Ok(CrawlUrl::from_parts(
        None,
        None,
        None,
        url.path().to_string(),
        url.query().map(str::to_string),
    ))
}

fn parse_with(
    input: &str,
    base: Option<&Url>,
    query_encoding: &'static Encoding,
) -> Result<Url, UrlError> {
    let options = Url::options().base_url(base);

    let result = if query_encoding == UTF_8 {
        options.parse(input)
    } else {
        let encode_query: &dyn Fn(&str) -> Cow<'_, [u8]> =
            &move |query| query_encoding.encode(query).0;
        options.encoding_override(Some(encode_query)).parse(input)
    };

    result.map_err(|e| UrlError::Parse(format!("{}: '{}'", e, input)))
}

fn from_absolute(url: &Url, keep_scheme: bool) -> Result<CrawlUrl, UrlError> {
    let host = url.host_str().ok_or(UrlError::MissingHost)?;

    Ok(CrawlUrl::from_parts(
        keep_scheme.then(|| url.scheme().to_string()),
        Some(host.to_string()),
        url.port(),
        url.path().to_string(),
        url.query().map(str::to_string),
    ))
}

fn strip_fragment(reference: &str) -> &str {
    match reference.find('#') {
        Some(index) => &reference[..index],
        None => reference,
    }
}

/// Returns the scheme of a reference, if it has one (RFC 3986 `scheme ":"`)
fn split_scheme(reference: &str) -> Option<&str> {
    let colon = reference.find(':')?;
    let candidate = &reference[..colon];

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate)
    } else {
        None
    }
}
