//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one crawl session (idle, running, done)
//! - `RequestStats`: the immutable record produced for every processed frontier entry

mod crawl_state;
mod request_stats;

// Re-export main types
pub use crawl_state::CrawlState;
pub use request_stats::RequestStats;
