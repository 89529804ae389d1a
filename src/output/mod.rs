//! Output module for live progress and crawl summaries
//!
//! This module handles:
//! - Printing one progress line per crawl event
//! - Aggregating a finished crawl into a summary
//! - Rendering the summary as terminal tables or a markdown file

mod markdown;
mod progress;
mod summary;
mod table;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use progress::{
    format_event, format_request_line, format_seconds, format_status, print_progress, LineLevel,
    ProgressLine,
};
pub use summary::{format_text_summary, CrawlSummary, SLOWEST_REQUESTS};
pub use table::render_table;

use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes the plain-text summary to `out`
pub fn print_summary<W: Write>(summary: &CrawlSummary, out: &mut W) -> OutputResult<()> {
    out.write_all(format_text_summary(summary).as_bytes())?;
    out.flush()?;
    Ok(())
}
