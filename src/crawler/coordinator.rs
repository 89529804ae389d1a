//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties together:
//! - The FIFO frontier and the visited set
//! - Fetching, classification and per-request statistics
//! - Link extraction, normalization against the seed, and filtering
//! - Progress events for the reporting side

use crate::config::CrawlConfig;
use crate::crawler::filter::UrlFilter;
use crate::crawler::frontier::{Frontier, FrontierEntry, VisitedSet};
use crate::crawler::parser::extract_links;
use crate::crawler::Fetcher;
use crate::state::{CrawlState, RequestStats};
use crate::url::{normalize_against, CrawlUrl};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

/// Progress notifications emitted while crawling
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// A frontier entry was fetched; sent exactly once per processed entry
    Request(RequestStats),

    /// A fetch failed outside the outcome contract; the entry was dropped
    ///
    /// Skipped entries are not marked visited and do not count against the limit.
    Skipped {
        url: CrawlUrl,
        found_on: Option<CrawlUrl>,
        message: String,
    },
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// The seed URL
    pub start_url: CrawlUrl,

    /// The configured request limit
    pub limit: usize,

    /// One record per processed entry, in fetch order
    pub requests: Vec<RequestStats>,

    /// True if the crawl stopped because the limit was exhausted
    pub limit_reached: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Breadth-first, single-flight crawler bound to one seed
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Fetcher,
    filter: UrlFilter,
    frontier: Frontier,
    visited: VisitedSet,
    state: CrawlState,
    requests: Vec<RequestStats>,
}

impl Crawler {
    /// Creates an idle crawler whose frontier holds only the seed
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(config.fetch.clone(), config.basic_auth.clone())?;
        let filter = UrlFilter::new(&config.seed, config.exclude.clone());
        let frontier = Frontier::with_seed(config.seed.clone());

        Ok(Self {
            config,
            fetcher,
            filter,
            frontier,
            visited: VisitedSet::new(),
            state: CrawlState::Idle,
            requests: Vec::new(),
        })
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Number of processed entries so far
    pub fn processed(&self) -> usize {
        self.requests.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    fn transition(&mut self, next: CrawlState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
    }

    fn limit_reached(&self) -> bool {
        self.processed() >= self.config.limit
    }

    /// Runs the crawl to completion
    ///
    /// Events go to `events` if given; a closed receiver does not stop the crawl.
    pub async fn run(mut self, events: Option<UnboundedSender<CrawlEvent>>) -> CrawlReport {
        let started_at = Utc::now();
        let start = std::time::Instant::now();

        tracing::info!(
            "Starting crawl of {} (limit {})",
            self.config.seed,
            self.config.limit
        );

        while !self.step(events.as_ref()).await.is_terminal() {}

        let limit_reached = self.limit_reached();
        if limit_reached {
            tracing::warn!("Request limit of {} reached", self.config.limit);
        }

        tracing::info!(
            "Crawl completed: {} requests in {:?}, {} URLs left in frontier",
            self.processed(),
            start.elapsed(),
            self.frontier.len()
        );

        CrawlReport {
            start_url: self.config.seed,
            limit: self.config.limit,
            requests: self.requests,
            limit_reached,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Advances the crawl by one loop iteration and returns the resulting state
    ///
    /// # Iteration
    ///
    /// 1. `Idle` moves to `Running`
    /// 2. An empty frontier or an exhausted limit moves to `Done`
    /// 3. The head entry is popped; an already visited URL is dropped without counting
    /// 4. Otherwise the URL is fetched, recorded, marked visited and reported
    /// 5. For a 2xx response the body's links are normalized, filtered and enqueued
    pub async fn step(&mut self, events: Option<&UnboundedSender<CrawlEvent>>) -> CrawlState {
        match self.state {
            CrawlState::Done => return self.state,
            CrawlState::Idle => self.transition(CrawlState::Running),
            CrawlState::Running => {}
        }

        if self.limit_reached() {
            self.transition(CrawlState::Done);
            return self.state;
        }

        let Some(entry) = self.frontier.pop() else {
            tracing::debug!("Frontier is empty");
            self.transition(CrawlState::Done);
            return self.state;
        };

        if self.visited.contains(&entry.url) {
            tracing::trace!("Already visited {}, dropping", entry.url);
            return self.state;
        }

        self.process_entry(entry, events).await;
        self.state
    }

    async fn process_entry(
        &mut self,
        entry: FrontierEntry,
        events: Option<&UnboundedSender<CrawlEvent>>,
    ) {
        tracing::debug!("Processing URL: {}", entry.url);

        let outcome = match self.fetcher.fetch(&entry.url).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Skipping {}: {}", entry.url, e);
                emit(
                    events,
                    CrawlEvent::Skipped {
                        url: entry.url,
                        found_on: entry.found_on,
                        message: e.to_string(),
                    },
                );
                return;
            }
        };

        let stats = RequestStats::from_outcome(entry.url.clone(), entry.found_on, &outcome);
        self.requests.push(stats.clone());
        self.visited.insert(&entry.url);
        emit(events, CrawlEvent::Request(stats));

        if !outcome.is_success() {
            return;
        }

        if let Some(body) = outcome.body() {
            let links = extract_links(body, outcome.content_type());
            let enqueued = self.enqueue_links(&links, &entry.url);
            tracing::debug!(
                "{}: {} links found, {} enqueued",
                entry.url,
                links.len(),
                enqueued
            );
        }
    }

    /// Normalizes, filters and enqueues links found on `found_on`
    ///
    /// Returns the number of entries added to the frontier.
    fn enqueue_links(&mut self, links: &[CrawlUrl], found_on: &CrawlUrl) -> usize {
        let mut enqueued = 0;

        for link in links {
            let candidate = normalize_against(link, &self.config.seed);

            if self.filter.should_crawl(&candidate, &self.visited) {
                self.frontier
                    .push(FrontierEntry::discovered(candidate, found_on.clone()));
                enqueued += 1;
            }
        }

        enqueued
    }
}

fn emit(events: Option<&UnboundedSender<CrawlEvent>>, event: CrawlEvent) {
    if let Some(sender) = events {
        if sender.send(event).is_err() {
            tracing::trace!("Event receiver closed, continuing without progress events");
        }
    }
}

/// Runs a complete crawl for the given configuration
///
/// # Arguments
///
/// * `config` - The validated crawl configuration
/// * `events` - Optional channel for live progress
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::{build_config, FileConfig, Overrides};
/// use site_crawler::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = build_config("https://example.com/", FileConfig::default(), Overrides::default())?;
/// let report = run_crawl(config, None).await?;
/// println!("{} requests", report.requests.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: CrawlConfig,
    events: Option<UnboundedSender<CrawlEvent>>,
) -> Result<CrawlReport, CrawlError> {
    let crawler = Crawler::new(config)?;
    Ok(crawler.run(events).await)
}
