//! Fetch workers
//!
//! Every worker runs the same loop: take a URL from the shared frontier,
//! wait for a rate-limiter token, fetch the page, and send the outcome to
//! the coordinator. Workers never touch crawl state.

use crate::crawler::fetcher::{fetch_links, HttpClient};
use crate::crawler::limiter::RateLimiter;
use crate::state::{PageError, PageRecord};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Receiving end of the frontier, shared by all workers
pub(crate) type FrontierReceiver = Arc<Mutex<mpsc::Receiver<Url>>>;

/// One fetch executor of the worker pool
pub(crate) struct Worker<C> {
    id: usize,
    client: Arc<C>,
    limiter: Arc<RateLimiter>,
    frontier: FrontierReceiver,
    results: mpsc::Sender<PageRecord>,
    cancel: CancellationToken,
}

impl<C: HttpClient> Worker<C> {
    /// Runs until the frontier is closed and drained, the run is cancelled,
    /// or the coordinator stops listening
    pub(crate) async fn run(self) {
        tracing::trace!("Worker {} started", self.id);

        while let Some(page_url) = self.next_url().await {
            let record = self.visit(page_url).await;

            if self.results.send(record).await.is_err() {
                tracing::trace!("Worker {}: coordinator gone", self.id);
                break;
            }
        }

        tracing::trace!("Worker {} exiting", self.id);
    }

    /// Takes the next URL off the frontier, or `None` once it is closed or
    /// the run is cancelled
    async fn next_url(&self) -> Option<Url> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            url = async { self.frontier.lock().await.recv().await } => url,
        }
    }

    /// Fetches one page and packages the outcome
    async fn visit(&self, page_url: Url) -> PageRecord {
        tracing::info!("Visiting page: {}", page_url);

        if let Err(e) = self.limiter.acquire(&self.cancel).await {
            return PageRecord::failure(page_url, e);
        }

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PageError::Cancelled),
            result = fetch_links(self.client.as_ref(), &page_url) => result,
        };

        match fetched {
            Ok(links) => {
                tracing::debug!("Found {} links on {}", links.len(), page_url);
                PageRecord::success(page_url, links)
            }
            Err(PageError::UnsupportedMediaType(media_type)) => {
                tracing::warn!("Unsupported media type {} at {}", media_type, page_url);
                PageRecord::failure(page_url, PageError::UnsupportedMediaType(media_type))
            }
            Err(e) => {
                tracing::error!("Failed to fetch links for {}: {}", page_url, e);
                PageRecord::failure(page_url, e)
            }
        }
    }
}

/// Spawns a fixed pool of identical workers
///
/// # Arguments
///
/// * `count` - Number of workers
/// * `client` - HTTP client shared by all workers
/// * `limiter` - Rate limiter shared by all workers
/// * `frontier` - Receiving end of the frontier
/// * `results` - Sending end of the results channel; each worker gets a clone
/// * `cancel` - Stops every worker at its next blocking point
pub(crate) fn spawn_workers<C: HttpClient>(
    count: usize,
    client: Arc<C>,
    limiter: Arc<RateLimiter>,
    frontier: FrontierReceiver,
    results: mpsc::Sender<PageRecord>,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|id| {
            let worker = Worker {
                id,
                client: client.clone(),
                limiter: limiter.clone(),
                frontier: frontier.clone(),
                results: results.clone(),
                cancel: cancel.clone(),
            };
            tokio::spawn(worker.run())
        })
        .collect()
}
