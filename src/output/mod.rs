//! Output module for rendering crawl results
//!
//! This module handles:
//! - Plain-text rendering of recorded pages
//! - Generating markdown summaries of a crawl run
//! - Recording crawl statistics

mod markdown;
pub mod stats;
mod text;

pub use markdown::{format_markdown_summary, write_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};
pub use text::{sorted_pages, write_pages};
