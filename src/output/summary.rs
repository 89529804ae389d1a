//! Crawl summary aggregation and plain-text rendering

use crate::crawler::CrawlReport;
use crate::output::progress::{format_seconds, format_status};
use crate::output::table::render_table;
use crate::state::RequestStats;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Number of rows in the slowest-requests table
pub const SLOWEST_REQUESTS: usize = 3;

pub const SLOWEST_HEADERS: [&str; 4] = ["URL", "Status", "Time", "First found on"];
pub const FAILED_HEADERS: [&str; 5] = ["URL", "Status", "Time", "Error", "First found on"];

/// Aggregated view of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub start_url: String,
    pub limit: usize,
    pub limit_reached: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,

    /// Mean elapsed seconds over requests that have a time
    pub average_seconds: Option<f64>,

    /// Slowest successful requests, slowest first
    pub slowest: Vec<RequestStats>,

    /// Every failed request, in fetch order
    pub failed: Vec<RequestStats>,
}

impl CrawlSummary {
    pub fn from_report(report: &CrawlReport) -> Self {
        let requests = &report.requests;

        let timed: Vec<f64> = requests
            .iter()
            .filter_map(|r| r.elapsed_seconds)
            .collect();
        let average_seconds =
            (!timed.is_empty()).then(|| timed.iter().sum::<f64>() / timed.len() as f64);

        let mut slowest: Vec<RequestStats> =
            requests.iter().filter(|r| r.success).cloned().collect();
        slowest.sort_by(|a, b| {
            b.elapsed_seconds
                .partial_cmp(&a.elapsed_seconds)
                .unwrap_or(Ordering::Equal)
        });
        slowest.truncate(SLOWEST_REQUESTS);

        let failed: Vec<RequestStats> = requests.iter().filter(|r| r.failed).cloned().collect();

        Self {
            start_url: report.start_url.to_string(),
            limit: report.limit,
            limit_reached: report.limit_reached,
            started_at: report.started_at,
            finished_at: report.finished_at,
            total_requests: requests.len(),
            successful_requests: requests.iter().filter(|r| r.success).count(),
            failed_requests: failed.len(),
            average_seconds,
            slowest,
            failed,
        }
    }

    /// Wall time of the whole crawl
    pub fn duration_seconds(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    pub fn slowest_rows(&self) -> Vec<Vec<String>> {
        self.slowest
            .iter()
            .map(|r| {
                vec![
                    r.url.to_string(),
                    format_status(r.status),
                    format_seconds(r.elapsed_seconds),
                    found_on_cell(r),
                ]
            })
            .collect()
    }

    pub fn failed_rows(&self) -> Vec<Vec<String>> {
        self.failed
            .iter()
            .map(|r| {
                vec![
                    r.url.to_string(),
                    format_status(r.status),
                    format_seconds(r.elapsed_seconds),
                    r.error_message.clone().unwrap_or_else(|| "N/A".to_string()),
                    found_on_cell(r),
                ]
            })
            .collect()
    }
}

fn found_on_cell(stats: &RequestStats) -> String {
    stats
        .found_on
        .as_ref()
        .map(|url| url.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Renders the end-of-crawl summary for the terminal
pub fn format_text_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("Crawling completed for {}\n", summary.start_url));
    if summary.limit_reached {
        out.push_str(&format!("Crawling limit of {} reached.\n", summary.limit));
    }
    out.push_str(&format!("Total requests: {}\n", summary.total_requests));
    out.push_str(&format!(
        "Total successful requests: {}\n",
        summary.successful_requests
    ));
    out.push_str(&format!(
        "Total failed requests: {}\n",
        summary.failed_requests
    ));
    out.push_str(&format!(
        "Average request time: {} seconds\n",
        format_seconds(summary.average_seconds)
    ));
    out.push('\n');

    out.push_str("Slowest requests:\n");
    out.push_str(&render_table(&SLOWEST_HEADERS, &summary.slowest_rows()));

    if !summary.failed.is_empty() {
        out.push_str("Failed requests:\n");
        out.push_str(&render_table(&FAILED_HEADERS, &summary.failed_rows()));
    }

    out
}
