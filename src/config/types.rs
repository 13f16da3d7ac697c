use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Walker
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawl orchestration configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers
    pub workers: usize,

    /// Interval at which the shared rate limiter refills its single token (milliseconds)
    pub rate_limit_interval_ms: u64,

    /// Maximum number of URLs waiting in the frontier before new links are dropped
    pub frontier_capacity: usize,

    /// Buffer size of the worker-to-coordinator results channel
    pub results_capacity: usize,

    /// Deadline for the whole run (seconds)
    pub run_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_interval_ms)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 50,
            rate_limit_interval_ms: 50,
            frontier_capacity: 100_000,
            results_capacity: 10,
            run_timeout_secs: 600,
        }
    }
}

/// HTTP transport configuration
///
/// None of this reaches the crawl core; it only shapes the client handed to it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Total timeout for a single request (seconds)
    pub request_timeout_secs: u64,

    /// Timeout for establishing a connection (seconds)
    pub connect_timeout_secs: u64,

    /// Maximum number of redirects followed per request
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("site-walker/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 10,
            connect_timeout_secs: 10,
            max_redirects: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path of the markdown summary file, if one should be written
    pub summary_path: Option<String>,
}
