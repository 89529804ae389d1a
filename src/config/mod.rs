//! Configuration module for Site-Crawler
//!
//! This module merges an optional TOML configuration file with command-line overrides
//! and validates the result before any request is made.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::config::{build_config, load_file_config, Overrides};
//! use std::path::Path;
//!
//! let file = load_file_config(Path::new("crawl.toml")).unwrap();
//! let config = build_config("https://example.com/", file, Overrides::default()).unwrap();
//! println!("Crawler will process at most {} URLs", config.limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BasicAuth, CrawlConfig, CrawlSection, FetchPolicy, FetchSection, FileConfig, Overrides,
    DEFAULT_HEADER_NAME, DEFAULT_HEADER_VALUE, DEFAULT_LIMIT,
};

// Re-export parser functions
pub use parser::{build_config, load_file_config, parse_exclude_list};
