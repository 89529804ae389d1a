//! URL handling module for Site-Crawler
//!
//! This module provides the crawler's URL value type, href parsing restricted to
//! HTTP(S), and seed-relative normalization of discovered links.

mod normalize;
mod parse;

use crate::UrlError;
use std::fmt;
use std::hash::{Hash, Hasher};

// Re-export main functions
pub use normalize::normalize_against;
pub use parse::{parse_href, parse_href_with_encoding, HTTP_SCHEMES};

/// An immutable URL value made of optional scheme/host/port, a path and an optional query
///
/// Discovered hrefs may be relative, so scheme and host are optional until the URL is
/// normalized against the seed. Every `with_*` method returns a new value; nothing is
/// mutated in place.
///
/// Two URLs are equal when their rendered forms are equal. No trailing-slash, query-order
/// or case canonicalization is applied beyond what parsing already does.
#[derive(Debug, Clone)]
pub struct CrawlUrl {
    scheme: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: String,
    query: Option<String>,
}

impl CrawlUrl {
    pub(crate) fn from_parts(
        scheme: Option<String>,
        host: Option<String>,
        port: Option<u16>,
        path: String,
        query: Option<String>,
    ) -> Self {
        Self {
            scheme,
            host,
            port,
            path,
            query,
        }
    }

    /// Parses an absolute HTTP(S) URL, such as a seed
    ///
    /// # Examples
    ///
    /// ```
    /// use site_crawler::url::CrawlUrl;
    ///
    /// let url = CrawlUrl::parse_absolute("https://example.com/docs?page=2").unwrap();
    /// assert_eq!(url.host(), Some("example.com"));
    /// assert_eq!(url.to_string(), "https://example.com/docs?page=2");
    ///
    /// assert!(CrawlUrl::parse_absolute("/relative").is_err());
    /// ```
    pub fn parse_absolute(raw: &str) -> Result<Self, UrlError> {
        let url = parse_href(raw, HTTP_SCHEMES)?;
        if url.scheme.is_none() {
            return Err(UrlError::Malformed(format!("missing scheme in '{}'", raw)));
        }
        if url.host.is_none() {
            return Err(UrlError::MissingHost);
        }
        Ok(url)
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns true if both scheme and host are present
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some() && self.host.is_some()
    }

    pub fn with_scheme(&self, scheme: Option<&str>) -> Self {
        Self {
            scheme: scheme.map(str::to_ascii_lowercase),
            ..self.clone()
        }
    }

    pub fn with_host(&self, host: Option<&str>) -> Self {
        Self {
            host: host.map(str::to_string),
            ..self.clone()
        }
    }

    pub fn with_port(&self, port: Option<u16>) -> Self {
        Self {
            port,
            ..self.clone()
        }
    }

    /// Returns a copy with the path replaced; a missing leading slash is added
    pub fn with_path(&self, path: &str) -> Self {
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        Self {
            path,
            ..self.clone()
        }
    }

    pub fn with_query(&self, query: Option<&str>) -> Self {
        Self {
            query: query.map(str::to_string),
            ..self.clone()
        }
    }

    /// Converts to a `url::Url` for the HTTP client
    ///
    /// Fails for URLs that were never normalized against a seed.
    pub fn to_url(&self) -> Result<::url::Url, UrlError> {
        if !self.is_absolute() {
            return Err(UrlError::Malformed(format!(
                "'{}' is not an absolute URL",
                self
            )));
        }
        ::url::Url::parse(&self.to_string()).map_err(|e| UrlError::Parse(e.to_string()))
    }
}

impl fmt::Display for CrawlUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(host) = &self.host {
            write!(f, "//{}", host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

impl PartialEq for CrawlUrl {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for CrawlUrl {}

impl Hash for CrawlUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}
