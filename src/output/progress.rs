use crate::crawler::CrawlEvent;
use crate::state::RequestStats;
use std::fmt;
use tokio::sync::mpsc::UnboundedReceiver;

/// Severity of a live progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    Info,
    Warn,
    Error,
}

/// One line of live crawl output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLine {
    pub level: LineLevel,
    pub text: String,
}

impl fmt::Display for ProgressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            LineLevel::Info => write!(f, "{}", self.text),
            LineLevel::Warn => write!(f, "WARN  {}", self.text),
            LineLevel::Error => write!(f, "ERROR {}", self.text),
        }
    }
}

/// Formats a seconds value for display, `N/A` when absent
pub fn format_seconds(seconds: Option<f64>) -> String {
    seconds
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Formats a status code for display, `N/A` when absent
pub fn format_status(status: Option<u16>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Builds the live line for a processed request
///
/// `Status: <code>, <seconds>, <url>[, Found on: <url>]`; anything but a 200 is a warning.
pub fn format_request_line(stats: &RequestStats) -> ProgressLine {
    let mut text = format!(
        "Status: {}, {}, {}",
        format_status(stats.status),
        format_seconds(stats.elapsed_seconds),
        stats.url
    );
    if let Some(found_on) = &stats.found_on {
        text.push_str(&format!(", Found on: {}", found_on));
    }

    let level = if stats.status == Some(200) {
        LineLevel::Info
    } else {
        LineLevel::Warn
    };

    ProgressLine { level, text }
}

/// Builds the live line for any crawl event
pub fn format_event(event: &CrawlEvent) -> ProgressLine {
    match event {
        CrawlEvent::Request(stats) => format_request_line(stats),
        CrawlEvent::Skipped { url, message, .. } => ProgressLine {
            level: LineLevel::Error,
            text: format!("{} on {}", message, url),
        },
    }
}

/// Prints events as they arrive until the sender side is dropped
///
/// Returns the number of events printed.
pub async fn print_progress(mut events: UnboundedReceiver<CrawlEvent>) -> usize {
    let mut printed = 0;
    while let Some(event) = events.recv().await {
        let line = format_event(&event);
        match line.level {
            LineLevel::Info => println!("{}", line),
            LineLevel::Warn | LineLevel::Error => eprintln!("{}", line),
        }
        printed += 1;
    }
    printed
}
