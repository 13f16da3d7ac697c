//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageRecord`: The outcome of fetching one page (links or an error)
//! - `PageError`: Per-page failures that never abort a run
//! - `CrawlState`: Seen-set, recorded pages and outstanding-work counter
//! - `Termination`: Why a run stopped

mod crawl_state;
mod page_record;

// Re-export main types
pub use crawl_state::{CrawlState, Termination};
pub use page_record::{PageError, PageRecord};
