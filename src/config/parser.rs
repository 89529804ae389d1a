use crate::config::types::{
    BasicAuth, CrawlConfig, FetchPolicy, FileConfig, Overrides, DEFAULT_LIMIT,
};
use crate::config::validation::{validate_fetch_section, validate_limit, validate_seed};
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// All tables and keys are optional. The file alone is not validated; validation happens
/// once it is merged with the command line in [`build_config`].
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_crawler::config::load_file_config;
///
/// let file = load_file_config(Path::new("crawl.toml")).unwrap();
/// println!("Limit: {:?}", file.crawl.limit);
/// ```
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: FileConfig = toml::from_str(&content)?;

    Ok(config)
}

/// Splits a comma-separated exclusion list, dropping empty entries
///
/// Entries are kept verbatim (no trimming); matching is a case-sensitive substring test.
pub fn parse_exclude_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merges file values, command-line overrides and the seed into a validated configuration
///
/// # Arguments
///
/// * `seed` - The seed URL as given by the user
/// * `file` - Values from the configuration file (or defaults)
/// * `overrides` - Values from the command line; each one wins over the file
///
/// # Returns
///
/// * `Ok(CrawlConfig)` - Ready to crawl
/// * `Err(ConfigError)` - Invalid seed or option; nothing must be fetched
pub fn build_config(
    seed: &str,
    file: FileConfig,
    overrides: Overrides,
) -> Result<CrawlConfig, ConfigError> {
    let seed = validate_seed(seed)?;

    let limit = overrides
        .limit
        .or(file.crawl.limit)
        .unwrap_or(DEFAULT_LIMIT);
    validate_limit(limit)?;

    let exclude = match overrides.exclude {
        Some(raw) => parse_exclude_list(&raw),
        None => file
            .crawl
            .exclude
            .into_iter()
            .filter(|pattern| !pattern.is_empty())
            .collect(),
    };

    let basic_auth = overrides
        .basic_auth
        .or(file.crawl.basic_auth)
        .map(|raw| raw.parse::<BasicAuth>())
        .transpose()?;

    validate_fetch_section(&file.fetch)?;
    let fetch = FetchPolicy::from(&file.fetch);

    Ok(CrawlConfig {
        seed,
        limit,
        exclude,
        basic_auth,
        fetch,
    })
}
