//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client from an explicit `FetchPolicy`
//! - The crawler identification header and optional basic auth
//! - Retry logic for transient failures
//! - Manual redirect following with a hop limit
//! - Outcome classification

use crate::config::{BasicAuth, FetchPolicy};
use crate::url::CrawlUrl;
use crate::UrlError;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use url::Url;
use std::time::{Duration, Instant};
use thiserror::Error;

const USER_AGENT: &str = concat!("site-crawler/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
///
/// Every request that reaches the network ends in one of these, including requests whose
/// retries were exhausted. Only failures outside of that contract are a [`FetchError`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// A response was received (any status)
    Response {
        /// HTTP status code of the final attempt
        status: u16,
        /// Wall time across all attempts
        elapsed: Duration,
        /// Number of attempts made
        attempts: u32,
        /// Content-Type header value
        content_type: Option<String>,
        /// Raw response body
        body: Vec<u8>,
    },

    /// No response could be obtained (timeout, connection refused, TLS error, ...)
    TransportFailure {
        /// Wall time across all attempts
        elapsed: Duration,
        /// Number of attempts made
        attempts: u32,
        /// Error description of the final attempt
        error: String,
    },

    /// The redirect chain exceeded the policy's limit
    TooManyRedirects {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// HTTP status code, absent when no response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 2xx response
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Response { status, .. } if (200..300).contains(status))
    }

    /// True for a 4xx/5xx response or when no response was received
    pub fn is_failed(&self) -> bool {
        match self {
            Self::Response { status, .. } => *status >= 400,
            Self::TransportFailure { .. } | Self::TooManyRedirects { .. } => true,
        }
    }

    /// Wall time of the fetch; not measured for redirect-limit failures
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::Response { elapsed, .. } | Self::TransportFailure { elapsed, .. } => {
                Some(*elapsed)
            }
            Self::TooManyRedirects { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Response { .. } => None,
            Self::TransportFailure { error, .. } | Self::TooManyRedirects { error } => {
                Some(error.as_str())
            }
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            Self::Response { content_type, .. } => content_type.as_deref(),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&[u8]> {
        match self {
            Self::Response { body, .. } => Some(body.as_slice()),
            _ => None,
        }
    }
}

/// Failures that fall outside the fetch contract
///
/// The crawl engine reports these as diagnostics and skips the entry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid request URL {url}: {source}")]
    InvalidUrl { url: String, source: UrlError },

    #[error("Failed to build request for {url}: {source}")]
    Request { url: String, source: reqwest::Error },
}

/// Builds an HTTP client for the policy's timeout
///
/// Redirects are not followed by the client; [`Fetcher`] follows them itself so the hop
/// limit is exact.
///
/// # Example
///
/// ```
/// use site_crawler::config::FetchPolicy;
/// use site_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&FetchPolicy::default()).unwrap();
/// ```
pub fn build_http_client(policy: &FetchPolicy) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(policy.timeout)
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Resolves where a response redirects to, if it is a redirect worth following
///
/// Only 301, 302, 303, 307 and 308 with a `Location` that resolves to an http(s) URL are
/// followed. Relative locations resolve against `current`.
///
/// # Example
///
/// ```
/// use reqwest::StatusCode;
/// use site_crawler::crawler::redirect_target;
/// use url::Url;
///
/// let current = Url::parse("https://example.com/old").unwrap();
/// let next = redirect_target(&current, StatusCode::FOUND, Some("/new")).unwrap();
/// assert_eq!(next.as_str(), "https://example.com/new");
/// assert!(redirect_target(&current, StatusCode::OK, Some("/new")).is_none());
/// ```
pub fn redirect_target(current: &Url, status: StatusCode, location: Option<&str>) -> Option<Url> {
    let followable = matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    );
    if !followable {
        return None;
    }

    let next = current.join(location?.trim()).ok()?;
    matches!(next.scheme(), "http" | "https").then_some(next)
}

/// Why a single attempt produced no response
enum SendError {
    TooManyRedirects(String),
    Http(reqwest::Error),
}

/// Returns true if a response with this status is worth another attempt
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
}

/// Single-flight HTTP fetcher
pub struct Fetcher {
    client: Client,
    policy: FetchPolicy,
    basic_auth: Option<BasicAuth>,
}

impl Fetcher {
    /// Creates a fetcher for the given policy and optional credentials
    pub fn new(policy: FetchPolicy, basic_auth: Option<BasicAuth>) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&policy)?;
        Ok(Self {
            client,
            policy,
            basic_auth,
        })
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Fetches a URL with retry and redirect handling
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx/3xx/4xx | Final |
    /// | HTTP 5xx | Retry up to `max_attempts`, fixed delay |
    /// | Timeout / connection error / body read error | Retry up to `max_attempts`, fixed delay |
    /// | Redirect chain > `max_redirects` | Final → `TooManyRedirects` |
    ///
    /// The outcome of the last attempt is returned; exhausted retries are never an error.
    ///
    /// # Returns
    ///
    /// * `Ok(FetchOutcome)` - The classified outcome
    /// * `Err(FetchError)` - The URL is not absolute or the request could not be built
    pub async fn fetch(&self, url: &CrawlUrl) -> Result<FetchOutcome, FetchError> {
        let target = url.to_url().map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let max_attempts = self.policy.max_attempts.max(1);
        let start = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;
            tracing::trace!("GET {} (attempt {}/{})", target, attempts, max_attempts);

            let error = match self.send_following_redirects(&target).await {
                Ok(response) => {
                    let status = response.status();
                    if is_retryable_status(status) && attempts < max_attempts {
                        tracing::warn!(
                            "{} returned {}, retrying in {:?}",
                            target,
                            status,
                            self.policy.retry_delay
                        );
                        tokio::time::sleep(self.policy.retry_delay).await;
                        continue;
                    }

                    let content_type = response
                        .headers()
                        .get(reqwest::header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);

                    // A truncated or stalled body fails the attempt like a dropped connection
                    match response.bytes().await {
                        Ok(body) => {
                            return Ok(FetchOutcome::Response {
                                status: status.as_u16(),
                                elapsed: start.elapsed(),
                                attempts,
                                content_type,
                                body: body.to_vec(),
                            });
                        }
                        Err(e) => e,
                    }
                }
                Err(SendError::TooManyRedirects(error)) => {
                    tracing::debug!("Too many redirects from {}: {}", target, error);
                    return Ok(FetchOutcome::TooManyRedirects { error });
                }
                Err(SendError::Http(e)) if e.is_builder() => {
                    return Err(FetchError::Request {
                        url: target.to_string(),
                        source: e,
                    });
                }
                Err(SendError::Http(e)) => e,
            };

            if attempts < max_attempts {
                tracing::warn!(
                    "Request to {} failed ({}), retrying in {:?}",
                    target,
                    error,
                    self.policy.retry_delay
                );
                tokio::time::sleep(self.policy.retry_delay).await;
                continue;
            }

            return Ok(FetchOutcome::TransportFailure {
                elapsed: start.elapsed(),
                attempts,
                error: describe_transport_error(&error),
            });
        }
    }

    /// Sends one GET and follows up to `max_redirects` redirects
    ///
    /// Credentials are only sent while the chain stays on the original host.
    async fn send_following_redirects(&self, start: &Url) -> Result<Response, SendError> {
        let mut current = start.clone();

        for hop in 0..=self.policy.max_redirects {
            let same_host = current.host_str() == start.host_str();
            let response = self
                .request(&current, same_host)
                .send()
                .await
                .map_err(SendError::Http)?;

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok());

            match redirect_target(&current, response.status(), location) {
                Some(next) => {
                    tracing::trace!("Redirect {} of {}: {} -> {}", hop + 1, start, current, next);
                    current = next;
                }
                None => return Ok(response),
            }
        }

        Err(SendError::TooManyRedirects(format!(
            "Will not follow more than {} redirects",
            self.policy.max_redirects
        )))
    }

    fn request(&self, url: &Url, with_credentials: bool) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.clone()).header(
            self.policy.header_name.as_str(),
            self.policy.header_value.as_str(),
        );
        if with_credentials {
            if let Some(auth) = &self.basic_auth {
                request = request.basic_auth(&auth.user, Some(&auth.password));
            }
        }
        request
    }
}

/// Classifies a transport error into a short description
fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_body() || error.is_decode() {
        format!("Failed to read response body: {}", error)
    } else {
        error.to_string()
    }
}
