//! Configuration module for webrank
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webrank::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webrank.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.crawler.seed_url, config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FilterConfig, OutputConfig, RankConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
