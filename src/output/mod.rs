//! Output module for reporting crawl results
//!
//! This module handles:
//! - Crawl statistics collected while the crawl runs
//! - The ranking summary printed to stdout
//! - The optional markdown report

mod markdown;
pub mod stats;
mod summary;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_statistics, CrawlCounters, CrawlStats};
pub use summary::{print_ranking, RankedPage, RankingSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
