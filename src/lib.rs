//! webrank: crawl a site and rank its pages
//!
//! This crate crawls the pages reachable from a seed URL under a host/path allowlist,
//! records the link graph of every page it visits and ranks the pages with PageRank.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod http;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for webrank operations
#[derive(Debug, Error)]
pub enum WebrankError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] http::FetchError),

    #[error("Link graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid allowlist pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Scheme missing: {0}")]
    MissingScheme(String),

    #[error("Invalid host name: {0}")]
    InvalidHost(String),

    #[error("Bad port number: {0}")]
    BadPort(String),
}

/// Link graph errors
///
/// Both variants leave the shared graph unusable for the rest of the crawl.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Failed to grow link graph to {capacity} nodes")]
    Grow { capacity: usize },

    #[error("URL is not registered in the link graph: {0}")]
    UnknownUrl(String),
}

/// Result type alias for webrank operations
pub type Result<T> = std::result::Result<T, WebrankError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for link graph operations
pub type GraphResult<T> = std::result::Result<T, GraphError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport};
pub use graph::{LinkGraph, NodeId, PageRank, RankOutcome};
pub use url::{merge, parse_url, simplify, ParsedUrl, UrlFilter};
