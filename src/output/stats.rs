//! Crawl statistics
//!
//! Workers bump the counters in [`CrawlCounters`] as they go; a
//! [`CrawlStats`] snapshot is taken once the crawl is over.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Live counters shared by all crawl tasks
#[derive(Debug)]
pub struct CrawlCounters {
    started_at: DateTime<Utc>,
    started: Instant,
    pages_fetched: AtomicU64,
    pages_failed: AtomicU64,
    links_seen: AtomicU64,
    links_skipped: AtomicU64,
}

impl Default for CrawlCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            pages_fetched: AtomicU64::new(0),
            pages_failed: AtomicU64::new(0),
            links_seen: AtomicU64::new(0),
            links_skipped: AtomicU64::new(0),
        }
    }

    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A link that passed the filter and was recorded in the graph
    pub fn link_seen(&self) {
        self.links_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Links rejected by the filter or the depth limit
    pub fn links_skipped(&self, count: u64) {
        self.links_skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn pages_failed(&self) -> u64 {
        self.pages_failed.load(Ordering::Relaxed)
    }

    /// Freezes the counters; `frontier_high_water` comes from the frontier
    pub fn snapshot(&self, frontier_high_water: usize) -> CrawlStats {
        CrawlStats {
            started_at: self.started_at,
            elapsed: self.started.elapsed(),
            pages_fetched: self.pages_fetched(),
            pages_failed: self.pages_failed(),
            links_seen: self.links_seen.load(Ordering::Relaxed),
            links_skipped: self.links_skipped.load(Ordering::Relaxed),
            frontier_high_water,
        }
    }
}

/// Final statistics of one crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStats {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub pages_fetched: u64,
    pub pages_failed: u64,
    pub links_seen: u64,
    pub links_skipped: u64,
    pub frontier_high_water: usize,
}

impl CrawlStats {
    /// Pages fetched per second of wall time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_fetched as f64 / secs
        } else {
            0.0
        }
    }

    /// Share of attempted pages that were fetched, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Pages failed: {}", stats.pages_failed);
    println!("  Links recorded: {}", stats.links_seen);
    println!("  Links skipped: {}", stats.links_skipped);
    println!("  Frontier high-water mark: {}", stats.frontier_high_water);
    println!(
        "  Elapsed: {:.2}s ({:.2} pages/sec)",
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    );
    println!("  Success rate: {:.1}%", stats.success_rate());
    println!();
}
