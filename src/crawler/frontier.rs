//! Frontier queue and visited set
//!
//! The frontier is a plain FIFO queue, which gives breadth-first order. Entries are not
//! deduplicated on insert: the same URL may be queued several times before it is first
//! fetched, and later copies are discarded when popped.

use crate::url::CrawlUrl;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to fetch
    pub url: CrawlUrl,

    /// The page the URL was found on (`None` for the seed)
    pub found_on: Option<CrawlUrl>,
}

impl FrontierEntry {
    pub fn seed(url: CrawlUrl) -> Self {
        Self {
            url,
            found_on: None,
        }
    }

    pub fn discovered(url: CrawlUrl, found_on: CrawlUrl) -> Self {
        Self {
            url,
            found_on: Some(found_on),
        }
    }
}

/// FIFO queue of URLs to fetch
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed
    pub fn with_seed(seed: CrawlUrl) -> Self {
        let mut frontier = Self::new();
        frontier.push(FrontierEntry::seed(seed));
        frontier
    }

    /// Adds an entry to the tail
    pub fn push(&mut self, entry: FrontierEntry) {
        self.queue.push_back(entry);
    }

    /// Removes the head entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// URLs that have been fetched, keyed by their rendered form
///
/// Only grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited, returning false if it already was
    pub fn insert(&mut self, url: &CrawlUrl) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &CrawlUrl) -> bool {
        self.urls.contains(&url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
