//! Mutable crawl state owned by the coordinator
//!
//! Nothing in here is synchronized. The coordinator task is the only writer,
//! and workers never see this state; they only exchange messages with the
//! coordinator over channels.

use crate::state::PageRecord;
use crate::url::CanonicalKey;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Why a crawl run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// All outstanding work resolved
    Completed,

    /// The caller's cancellation token fired
    Cancelled,

    /// The configured run deadline passed
    DeadlineExceeded,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
        }
    }

    /// Returns true if the run stopped before the frontier drained
    pub fn is_early(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seen-set, recorded pages and the outstanding-work counter
///
/// Invariants:
/// - `seen` only grows during a run
/// - a key is in `seen` before its URL is pushed onto the frontier
/// - `outstanding` counts frontier pushes not yet answered by a result and
///   never drops below zero
#[derive(Debug, Default)]
pub struct CrawlState {
    seen: HashSet<CanonicalKey>,
    pages: HashMap<CanonicalKey, PageRecord>,
    outstanding: usize,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as seen
    ///
    /// Returns true if the key was not seen before, i.e. the caller may
    /// enqueue the URL.
    pub fn mark_seen(&mut self, key: CanonicalKey) -> bool {
        self.seen.insert(key)
    }

    pub fn is_seen(&self, key: &CanonicalKey) -> bool {
        self.seen.contains(key)
    }

    /// Accounts for a URL about to be pushed onto the frontier
    pub fn begin_fetch(&mut self) {
        self.outstanding += 1;
    }

    /// Accounts for a result received for a previously pushed URL, or for a
    /// push that did not go through
    pub fn resolve_fetch(&mut self) {
        match self.outstanding.checked_sub(1) {
            Some(remaining) => self.outstanding = remaining,
            None => tracing::error!("Outstanding work counter would go negative, ignoring"),
        }
    }

    /// Stores a successfully fetched page under its canonical key
    ///
    /// Failed records are not stored.
    pub fn record(&mut self, record: PageRecord) {
        if !record.is_success() {
            return;
        }
        self.pages.insert(record.key(), record);
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Returns true once every pushed URL has been answered
    pub fn is_complete(&self) -> bool {
        self.outstanding == 0
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Consumes the state, keeping only the recorded pages
    pub fn into_pages(self) -> HashMap<CanonicalKey, PageRecord> {
        self.pages
    }
}
