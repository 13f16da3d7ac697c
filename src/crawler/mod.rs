//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through the `HttpClient` seam
//! - HTML parsing and link extraction
//! - Rate limiting and the worker pool
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod limiter;
mod parser;
mod worker;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_html, fetch_links, HttpClient};
pub use limiter::RateLimiter;
pub use parser::{extract_links, LinkDocument};

use crate::config::Config;
use crate::WalkerError;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Parse the root URL
/// 2. Build the HTTP client from the `[http]` settings
/// 3. Fetch pages with the worker pool until the site is exhausted,
///    `cancel` fires, or the run deadline passes
///
/// # Arguments
///
/// * `root_url` - Absolute URL to start from
/// * `config` - The crawler configuration
/// * `cancel` - Stops the run early; recorded pages are kept
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished, possibly early
/// * `Err(WalkerError)` - The root URL or HTTP client was invalid; nothing was fetched
pub async fn crawl(
    root_url: &str,
    config: &Config,
    cancel: CancellationToken,
) -> Result<CrawlReport, WalkerError> {
    let client = build_http_client(&config.http)?;
    let coordinator = Coordinator::new(root_url, client, config.crawler.clone())?;
    Ok(coordinator.run(cancel).await)
}
