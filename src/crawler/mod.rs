//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and redirect limits
//! - Charset-aware HTML link extraction
//! - The FIFO frontier, visited set and admission filter
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod filter;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, CrawlEvent, CrawlReport, Crawler};
pub use fetcher::{
    build_http_client, is_retryable_status, redirect_target, FetchError, FetchOutcome, Fetcher,
};
pub use filter::UrlFilter;
pub use frontier::{Frontier, FrontierEntry, VisitedSet};
pub use parser::{charset_from_content_type, extract_hrefs, extract_links};
