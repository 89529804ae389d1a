use crate::config::types::FetchSection;
use crate::url::CrawlUrl;
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};

/// Validates the seed URL
///
/// The seed must be an absolute http/https URL with a host. Anything else is a fatal
/// configuration error raised before the first fetch.
pub fn validate_seed(raw: &str) -> Result<CrawlUrl, ConfigError> {
    CrawlUrl::parse_absolute(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", raw, e)))
}

/// Validates the request limit
pub fn validate_limit(limit: usize) -> Result<(), ConfigError> {
    if limit < 1 {
        return Err(ConfigError::Validation(format!(
            "limit must be >= 1, got {}",
            limit
        )));
    }

    Ok(())
}

/// Validates the `[fetch]` table
pub fn validate_fetch_section(section: &FetchSection) -> Result<(), ConfigError> {
    if section.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            section.timeout_secs
        )));
    }

    if section.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            section.max_attempts
        )));
    }

    HeaderName::from_bytes(section.header_name.as_bytes()).map_err(|_| {
        ConfigError::Validation(format!(
            "header-name '{}' is not a valid HTTP header name",
            section.header_name
        ))
    })?;

    HeaderValue::from_str(&section.header_value).map_err(|_| {
        ConfigError::Validation(format!(
            "header-value '{}' is not a valid HTTP header value",
            section.header_value
        ))
    })?;

    Ok(())
}
