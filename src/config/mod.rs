//! Configuration module for Site-Walker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use site_walker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("walker.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
