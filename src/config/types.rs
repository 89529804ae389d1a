use crate::url::CrawlUrl;
use crate::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default cap on processed frontier entries
pub const DEFAULT_LIMIT: usize = 250;

/// Identification header sent with every request
pub const DEFAULT_HEADER_NAME: &str = "x-webhub";
pub const DEFAULT_HEADER_VALUE: &str = "webhub-site-crawler";

/// Fully resolved configuration for one crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts; also defines the allowed host
    pub seed: CrawlUrl,

    /// Maximum number of processed frontier entries
    pub limit: usize,

    /// Substrings that exclude a candidate URL when found in its path
    pub exclude: Vec<String>,

    /// Optional HTTP basic authentication
    pub basic_auth: Option<BasicAuth>,

    /// Timeout, redirect and retry policy for every fetch
    pub fetch: FetchPolicy,
}

/// On-disk configuration file layout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub crawl: CrawlSection,

    #[serde(default)]
    pub fetch: FetchSection,
}

/// `[crawl]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlSection {
    /// Maximum number of processed frontier entries
    pub limit: Option<usize>,

    /// Path substrings to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// `user:password`
    #[serde(rename = "basic-auth")]
    pub basic_auth: Option<String>,
}

/// `[fetch]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    /// Per-attempt request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Redirects followed before giving up
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Total attempts per URL, including the first one
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Name of the crawler identification header
    #[serde(rename = "header-name")]
    pub header_name: String,

    /// Value of the crawler identification header
    #[serde(rename = "header-value")]
    pub header_value: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            timeout_secs: policy.timeout.as_secs(),
            max_redirects: policy.max_redirects,
            max_attempts: policy.max_attempts,
            retry_delay_ms: policy.retry_delay.as_millis() as u64,
            header_name: policy.header_name,
            header_value: policy.header_value,
        }
    }
}

/// Values given on the command line; each one wins over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub limit: Option<usize>,

    /// Comma-separated exclusion list
    pub exclude: Option<String>,

    pub basic_auth: Option<String>,
}

/// Fetch behavior, kept explicit instead of relying on HTTP client defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout of a single attempt
    pub timeout: Duration,

    /// Redirects followed automatically; one more is a terminal failure
    pub max_redirects: usize,

    /// Total attempts per URL, including the first one
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub retry_delay: Duration,

    pub header_name: String,
    pub header_value: String,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_redirects: 3,
            max_attempts: 3,
            retry_delay: Duration::from_millis(200),
            header_name: DEFAULT_HEADER_NAME.to_string(),
            header_value: DEFAULT_HEADER_VALUE.to_string(),
        }
    }
}

impl From<&FetchSection> for FetchPolicy {
    fn from(section: &FetchSection) -> Self {
        Self {
            timeout: Duration::from_secs(section.timeout_secs),
            max_redirects: section.max_redirects,
            max_attempts: section.max_attempts,
            retry_delay: Duration::from_millis(section.retry_delay_ms),
            header_name: section.header_name.clone(),
            header_value: section.header_value.clone(),
        }
    }
}

/// Basic-auth credentials parsed from `user:password`
///
/// Only the first colon separates user from password, so the password may contain colons.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub user: String,
    pub password: String,
}

impl FromStr for BasicAuth {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (user, password) = raw.split_once(':').ok_or_else(|| {
            ConfigError::Validation("basic-auth must be given as user:password".to_string())
        })?;

        if user.is_empty() {
            return Err(ConfigError::Validation(
                "basic-auth user cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            user: user.to_string(),
            password: password.to_string(),
        })
    }
}

// Keeps the password out of logs
impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
