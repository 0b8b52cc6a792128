//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier with completion detection
//! - A fixed-size worker pool
//! - Link extraction from HTML
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod frontier;
mod pool;

pub use coordinator::{Coordinator, CrawlReport};
pub use extract::{HrefExtractor, LinkExtractor};
pub use frontier::{Frontier, FrontierEntry, Poll, WorkerId};
pub use pool::WorkerPool;

use crate::config::Config;
use crate::WebrankError;

/// Runs a complete crawl over TCP and ranks the result
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Register and queue the seed URL
/// 2. Fetch pages on a pool of `crawler.workers` tasks
/// 3. Record every accepted link in the link graph
/// 4. Rank the finished graph with PageRank
pub async fn crawl(config: Config) -> Result<CrawlReport, WebrankError> {
    Coordinator::from_config(config)?.run().await
}
