//! Site-Crawler: a same-domain breadth-first site crawler
//!
//! This crate crawls a website starting from a seed URL, following anchor links on the
//! same host until the frontier empties or a request limit is reached, and reports
//! per-request timing, status and aggregate success/failure statistics.

pub mod config;
pub mod crawler;
pub mod ddev;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
///
/// These are recoverable for discovered links: the offending candidate is dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors from locating a seed URL in a local DDEV project
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to determine the current working directory: {0}")]
    CurrentDir(std::io::Error),

    #[error("Failed to find or open the file \"{}\"", path.display())]
    ConfigFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to find a DDEV_PRIMARY_URL inside \"{}\"", path.display())]
    MissingPrimaryUrl { path: PathBuf },
}

/// Result type alias for Site-Crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{CrawlEvent, CrawlReport, Crawler};
pub use state::{CrawlState, RequestStats};
pub use url::CrawlUrl;
