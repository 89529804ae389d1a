//! Seed discovery for local DDEV projects
//!
//! DDEV writes the project's primary URL into its generated compose file. The crawl
//! entry point is fed that URL as the seed.

use crate::DiscoveryError;
use regex::Regex;
use std::path::{Path, PathBuf};

/// Location of the generated compose file relative to the project root
pub const DDEV_COMPOSE_FILE: &str = ".ddev/.ddev-docker-compose-full.yaml";

/// Extracts the first `DDEV_PRIMARY_URL` value from compose file contents
///
/// # Example
///
/// ```
/// use site_crawler::ddev::parse_primary_url;
///
/// let yaml = "services:\n  web:\n    environment:\n      DDEV_PRIMARY_URL: https://mysite.ddev.site\n";
/// assert_eq!(parse_primary_url(yaml), Some("https://mysite.ddev.site".to_string()));
/// ```
pub fn parse_primary_url(contents: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^\s*DDEV_PRIMARY_URL: (.+)$").ok()?;
    re.captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Finds the primary URL of the DDEV project rooted at `project_dir`
pub fn find_ddev_primary_url(project_dir: &Path) -> Result<String, DiscoveryError> {
    let path: PathBuf = project_dir.join(DDEV_COMPOSE_FILE);

    let contents = std::fs::read_to_string(&path)
        .map_err(|source| DiscoveryError::ConfigFileUnreadable {
            path: path.clone(),
            source,
        })?;

    let url = parse_primary_url(&contents)
        .ok_or_else(|| DiscoveryError::MissingPrimaryUrl { path: path.clone() })?;

    tracing::debug!("Found DDEV primary URL {} in {}", url, path.display());
    Ok(url)
}

/// Finds the primary URL of the DDEV project in the current working directory
pub fn find_ddev_primary_url_from_cwd() -> Result<String, DiscoveryError> {
    let cwd = std::env::current_dir().map_err(DiscoveryError::CurrentDir)?;
    find_ddev_primary_url(&cwd)
}
