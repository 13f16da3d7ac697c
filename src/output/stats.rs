//! Crawl run statistics
//!
//! The coordinator updates these counters as results arrive; they are
//! reported once the run is done.

use crate::state::PageError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run reached its end, set once it is done
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages fetched and recorded
    pub pages_recorded: u64,

    /// Pages whose fetch failed
    pub pages_failed: u64,

    /// Failed pages by error kind (see `PageError::kind`)
    pub errors_by_kind: HashMap<&'static str, u64>,

    /// Links found on recorded pages, duplicates and cross-host links included
    pub links_discovered: u64,

    /// Same-host links pushed onto the frontier
    pub links_enqueued: u64,

    /// Same-host links dropped because the frontier was full
    pub links_dropped: u64,
}

impl CrawlStatistics {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: None,
            pages_recorded: 0,
            pages_failed: 0,
            errors_by_kind: HashMap::new(),
            links_discovered: 0,
            links_enqueued: 0,
            links_dropped: 0,
        }
    }

    pub fn record_page(&mut self, link_count: usize) {
        self.pages_recorded += 1;
        self.links_discovered += link_count as u64;
    }

    pub fn record_failure(&mut self, error: &PageError) {
        self.pages_failed += 1;
        *self.errors_by_kind.entry(error.kind()).or_insert(0) += 1;
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = Some(finished_at);
    }

    /// Total number of fetch results received
    pub fn pages_visited(&self) -> u64 {
        self.pages_recorded + self.pages_failed
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    /// Percentage of visited pages that were recorded
    pub fn success_rate(&self) -> f64 {
        let visited = self.pages_visited();
        if visited == 0 {
            return 0.0;
        }
        (self.pages_recorded as f64 / visited as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages recorded: {}", stats.pages_recorded);
    println!("  Pages failed: {}", stats.pages_failed);
    println!("  Links found: {}", stats.links_discovered);
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!("  Links dropped (frontier full): {}", stats.links_dropped);
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {:.2}s", duration);
    }
    println!();

    if !stats.errors_by_kind.is_empty() {
        println!("Error Summary:");
        let mut error_counts: Vec<_> = stats.errors_by_kind.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

        for (kind, count) in error_counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully recorded)",
        stats.success_rate(),
        stats.pages_recorded,
        stats.pages_visited()
    );
}
