//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator is the only task that touches crawl state. It:
//! - Seeds the frontier with the root URL
//! - Spawns the worker pool
//! - Consumes worker results in arrival order
//! - Records pages and enqueues unseen same-host links
//! - Detects completion with the outstanding-work counter
//! - Stops early on cancellation or when the run deadline passes

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::HttpClient;
use crate::crawler::limiter::RateLimiter;
use crate::crawler::worker::spawn_workers;
use crate::output::CrawlStatistics;
use crate::state::{CrawlState, PageRecord, Termination};
use crate::url::{canonicalize, is_same_host, parse_absolute, CanonicalKey};
use crate::{ConfigError, WalkerError};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<C> {
    root: Url,
    client: Arc<C>,
    config: CrawlerConfig,
}

impl<C: HttpClient> Coordinator<C> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `root_url` - Absolute URL the crawl starts from; its host scopes the crawl
    /// * `client` - HTTP collaborator, configured entirely by the caller
    /// * `config` - Crawl orchestration settings
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(WalkerError)` - The root URL is malformed or has no host, or
    ///   the worker pool would be empty
    pub fn new(root_url: &str, client: C, config: CrawlerConfig) -> Result<Self, WalkerError> {
        let root = parse_absolute(root_url)?;

        if config.workers == 0 {
            return Err(ConfigError::Validation("workers must be >= 1".to_string()).into());
        }

        Ok(Self {
            root,
            client: Arc::new(client),
            config,
        })
    }

    /// Runs the crawl until all outstanding work resolves, `cancel` fires,
    /// or the run deadline passes
    ///
    /// Pages recorded before an early stop are kept in the report. Workers
    /// still in flight at that point are cancelled and not awaited.
    pub async fn run(self, cancel: CancellationToken) -> CrawlReport {
        let started_at = Utc::now();
        let start_time = Instant::now();
        let mut stats = CrawlStatistics::new(started_at);
        let mut state = CrawlState::new();

        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.root,
            self.config.workers
        );

        let (frontier_tx, frontier_rx) = mpsc::channel(self.config.frontier_capacity.max(1));
        let (results_tx, mut results_rx) = mpsc::channel(self.config.results_capacity.max(1));

        let worker_cancel = cancel.child_token();
        let handles = spawn_workers(
            self.config.workers,
            self.client.clone(),
            Arc::new(RateLimiter::new(self.config.rate_limit_interval())),
            Arc::new(Mutex::new(frontier_rx)),
            results_tx,
            worker_cancel.clone(),
        );

        state.mark_seen(canonicalize(&self.root));
        state.begin_fetch();
        if let Err(e) = frontier_tx.try_send(self.root.clone()) {
            tracing::error!("Failed to seed frontier with {}: {}", self.root, e);
            state.resolve_fetch();
        }

        let deadline = tokio::time::sleep(self.config.run_timeout());
        tokio::pin!(deadline);

        let termination = loop {
            if state.is_complete() {
                tracing::info!("Frontier is empty, crawl complete");
                break Termination::Completed;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::warn!("Crawl cancelled, keeping {} recorded pages", state.page_count());
                    break Termination::Cancelled;
                }
                _ = &mut deadline => {
                    tracing::warn!(
                        "Run deadline of {:?} exceeded, keeping {} recorded pages",
                        self.config.run_timeout(),
                        state.page_count()
                    );
                    break Termination::DeadlineExceeded;
                }
                received = results_rx.recv() => match received {
                    Some(record) => {
                        expand(&self.root, record, &mut state, &mut stats, &frontier_tx);

                        let visited = stats.pages_visited();
                        if visited % 10 == 0 {
                            let rate = visited as f64 / start_time.elapsed().as_secs_f64();
                            tracing::info!(
                                "Progress: {} pages visited, {} outstanding, {:.2} pages/sec",
                                visited,
                                state.outstanding(),
                                rate
                            );
                        }
                    }
                    None => {
                        tracing::error!("All workers exited with work outstanding");
                        break Termination::Cancelled;
                    }
                }
            }
        };

        // Closing the frontier lets idle workers exit
        drop(frontier_tx);

        if termination.is_early() {
            worker_cancel.cancel();
        } else {
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("Worker task failed: {}", e);
                }
            }
        }

        stats.finish(Utc::now());
        tracing::info!(
            "Crawl {}: {} pages recorded in {:?}",
            termination,
            state.page_count(),
            start_time.elapsed()
        );

        CrawlReport::new(self.root, state.into_pages(), termination, stats)
    }
}

/// Applies one worker result to the crawl state
///
/// Resolves the fetch that produced `record`. A successful page is recorded
/// and each of its same-host links whose canonical key is new is pushed onto
/// the frontier, in document order. A push that finds the frontier full is
/// dropped and not retried.
fn expand(
    root: &Url,
    record: PageRecord,
    state: &mut CrawlState,
    stats: &mut CrawlStatistics,
    frontier: &mpsc::Sender<Url>,
) {
    state.resolve_fetch();

    if let Some(error) = record.error() {
        stats.record_failure(error);
        return;
    }

    stats.record_page(record.links().len());

    for link in record.links() {
        if !is_same_host(root, link) {
            tracing::trace!("Not following off-host link {}", link);
            continue;
        }

        if !state.mark_seen(canonicalize(link)) {
            continue;
        }

        state.begin_fetch();
        match frontier.try_send(link.clone()) {
            Ok(()) => {
                stats.links_enqueued += 1;
                tracing::trace!("Enqueued {}", link);
            }
            Err(TrySendError::Full(dropped)) => {
                state.resolve_fetch();
                stats.links_dropped += 1;
                tracing::warn!("Frontier full, dropping {}", dropped);
            }
            Err(TrySendError::Closed(dropped)) => {
                state.resolve_fetch();
                stats.links_dropped += 1;
                tracing::warn!("Frontier closed, dropping {}", dropped);
            }
        }
    }

    state.record(record);
}

/// Outcome of a crawl run
#[derive(Debug)]
pub struct CrawlReport {
    root: Url,
    pages: HashMap<CanonicalKey, PageRecord>,

    /// Why the run stopped
    pub termination: Termination,

    pub stats: CrawlStatistics,
}

impl CrawlReport {
    pub(crate) fn new(
        root: Url,
        pages: HashMap<CanonicalKey, PageRecord>,
        termination: Termination,
        stats: CrawlStatistics,
    ) -> Self {
        Self {
            root,
            pages,
            termination,
            stats,
        }
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Recorded pages, in no particular order
    pub fn pages(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.values()
    }

    /// Looks up the recorded page for `url`, or any URL with the same canonical key
    pub fn page(&self, url: &Url) -> Option<&PageRecord> {
        self.pages.get(&canonicalize(url))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn into_pages(self) -> Vec<PageRecord> {
        self.pages.into_values().collect()
    }
}
