//! Crawl session lifecycle
//!
//! A session starts `Idle` with only the seed in its frontier, is `Running` while the
//! fetch/extract/enqueue loop spins, and ends `Done` once the frontier is empty or the
//! request limit is exhausted.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Constructed, nothing fetched yet
    Idle,

    /// The crawl loop is processing frontier entries
    Running,

    /// Frontier empty or request limit reached
    Done,
}

impl CrawlState {
    /// Returns true if the session can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Only `Idle -> Running` and `Running -> Done` are allowed.
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
