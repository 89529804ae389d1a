//! Markdown summary generation
//!
//! This module writes a human-readable markdown version of the crawl summary,
//! including totals, the slowest requests and every failed request.

use crate::output::summary::{CrawlSummary, FAILED_HEADERS, SLOWEST_HEADERS};
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to create or write the file
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let write = || -> std::io::Result<()> {
        let mut file = File::create(output_path)?;
        file.write_all(markdown.as_bytes())?;
        file.flush()
    };

    write().map_err(|source| OutputError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Site Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Start URL**: {}\n", summary.start_url));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        summary.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        summary.duration_seconds()
    ));
    md.push_str(&format!("- **Request Limit**: {}\n", summary.limit));
    if summary.limit_reached {
        md.push_str("\n> **Warning**: the request limit was reached before the frontier was empty.\n");
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total Requests**: {}\n", summary.total_requests));
    md.push_str(&format!(
        "- **Successful Requests**: {}\n",
        summary.successful_requests
    ));
    md.push_str(&format!("- **Failed Requests**: {}\n", summary.failed_requests));
    match summary.average_seconds {
        Some(avg) => md.push_str(&format!("- **Average Request Time**: {:.3} seconds\n\n", avg)),
        None => md.push_str("- **Average Request Time**: N/A\n\n"),
    }

    if !summary.slowest.is_empty() {
        md.push_str("## Slowest Requests\n\n");
        push_markdown_table(&mut md, &SLOWEST_HEADERS, &summary.slowest_rows());
    }

    if !summary.failed.is_empty() {
        md.push_str("## Failed Requests\n\n");
        push_markdown_table(&mut md, &FAILED_HEADERS, &summary.failed_rows());
    }

    md
}

fn push_markdown_table(md: &mut String, headers: &[&str], rows: &[Vec<String>]) {
    md.push_str(&format!("| {} |\n", headers.join(" | ")));
    md.push_str(&format!(
        "|{}\n",
        headers.iter().map(|_| "---|").collect::<String>()
    ));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| cell.replace('|', "\\|")).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    md.push('\n');
}
