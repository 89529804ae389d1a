use crate::crawler::FetchOutcome;
use crate::url::CrawlUrl;

/// The record produced for one processed frontier entry
///
/// Created once when the entry is fetched and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestStats {
    /// The URL that was requested
    pub url: CrawlUrl,

    /// The page the URL was first found on (`None` for the seed)
    pub found_on: Option<CrawlUrl>,

    /// HTTP status code, absent if no response was received
    pub status: Option<u16>,

    /// True for a 2xx response
    pub success: bool,

    /// True for a 4xx/5xx response or a request that never completed
    pub failed: bool,

    /// Wall time of the request including retries
    pub elapsed_seconds: Option<f64>,

    /// Diagnostic message for failed requests
    pub error_message: Option<String>,
}

impl RequestStats {
    /// Builds the record for a fetched URL from its fetch outcome
    pub fn from_outcome(url: CrawlUrl, found_on: Option<CrawlUrl>, outcome: &FetchOutcome) -> Self {
        Self {
            url,
            found_on,
            status: outcome.status(),
            success: outcome.is_success(),
            failed: outcome.is_failed(),
            elapsed_seconds: outcome.elapsed().map(|elapsed| elapsed.as_secs_f64()),
            error_message: outcome.error_message().map(str::to_string),
        }
    }
}
