//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator seeds the graph and frontier, keeps every pool slot busy
//! with a crawl step until the frontier reports completion, then ranks the
//! finished graph. Each step either processes one page, waits for work, or
//! notices that the crawl is over.

use crate::config::{validate, Config};
use crate::crawler::extract::{HrefExtractor, LinkExtractor};
use crate::crawler::frontier::{Frontier, FrontierEntry, Poll, WorkerId};
use crate::crawler::pool::WorkerPool;
use crate::graph::{Discovery, LinkGraph, PageRank, RankOutcome, SharedGraph};
use crate::http::{fetch_page, TcpTransport, Transport};
use crate::output::{CrawlCounters, CrawlStats};
use crate::url::{is_foreign_scheme, parse_url, resolve, UrlFilter};
use crate::{GraphError, WebrankError};
use parking_lot::Mutex;
use std::sync::Arc;

/// State shared by every crawl task
struct CrawlContext<T, E> {
    config: Config,
    graph: SharedGraph,
    frontier: Frontier,
    transport: T,
    extractor: E,
    filter: UrlFilter,
    counters: CrawlCounters,
    fatal: Mutex<Option<GraphError>>,
}

/// Result of a finished crawl
#[derive(Debug)]
pub struct CrawlReport {
    pub seed_url: String,
    pub graph: LinkGraph,
    pub outcome: RankOutcome,
    pub stats: CrawlStats,
}

/// Main crawler coordinator structure
pub struct Coordinator<T = TcpTransport, E = HrefExtractor> {
    ctx: Arc<CrawlContext<T, E>>,
    pool: WorkerPool,
    rank: PageRank,
}

impl Coordinator {
    /// Creates a coordinator that fetches over TCP and extracts `href`s
    pub fn from_config(config: Config) -> Result<Self, WebrankError> {
        Self::new(config, TcpTransport, HrefExtractor)
    }
}

impl<T: Transport, E: LinkExtractor> Coordinator<T, E> {
    /// Creates a new coordinator with the seed registered and queued
    pub fn new(config: Config, transport: T, extractor: E) -> Result<Self, WebrankError> {
        let seed = config.crawler.seed_url.clone();
        parse_url(&seed)?;
        validate(&config)?;

        let filter = UrlFilter::from_config(&config.filter)?;
        let mut graph = LinkGraph::with_capacity(config.crawler.initial_graph_capacity)?;
        graph.add_url(&seed)?;

        let workers = config.crawler.workers;
        let frontier = Frontier::new(workers);
        frontier.enqueue(seed, None, 0);

        Ok(Self {
            rank: PageRank::from_config(&config.rank),
            pool: WorkerPool::new(workers),
            ctx: Arc::new(CrawlContext {
                config,
                graph: SharedGraph::new(graph),
                frontier,
                transport,
                extractor,
                filter,
                counters: CrawlCounters::new(),
                fatal: Mutex::new(None),
            }),
        })
    }

    /// Crawls until the frontier is exhausted, then ranks the graph
    ///
    /// Failures of individual pages are logged and counted. A link graph
    /// error stops the crawl and is returned.
    pub async fn run(mut self) -> Result<CrawlReport, WebrankError> {
        let seed_url = self.ctx.config.crawler.seed_url.clone();
        tracing::info!(
            "Starting crawl from {} with {} workers",
            seed_url,
            self.pool.size()
        );

        while !self.ctx.frontier.is_finished() {
            let ctx = Arc::clone(&self.ctx);
            self.pool.submit(move |worker| crawl_step(ctx, worker)).await;
        }

        let panicked = self.pool.join().await;
        if panicked > 0 {
            tracing::warn!("{} crawl tasks panicked", panicked);
        }

        let ctx = Arc::try_unwrap(self.ctx).map_err(|_| {
            WebrankError::Worker("crawl context still shared after join".to_string())
        })?;
        if let Some(e) = ctx.fatal.into_inner() {
            return Err(e.into());
        }

        let stats = ctx.counters.snapshot(ctx.frontier.high_water());
        let graph = ctx.graph.into_inner().map_err(|_| {
            WebrankError::Worker("link graph still shared after join".to_string())
        })?;

        tracing::info!(
            "Crawl finished: {} pages fetched, {} failed, {} pages and {} links in graph ({:.2}s)",
            stats.pages_fetched,
            stats.pages_failed,
            graph.len(),
            graph.edge_count(),
            stats.elapsed.as_secs_f64()
        );

        let rank = self.rank;
        let (graph, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = rank.run(&graph);
            (graph, outcome)
        })
        .await
        .map_err(|e| WebrankError::Worker(format!("ranking task failed: {}", e)))?;

        Ok(CrawlReport {
            seed_url,
            graph,
            outcome,
            stats,
        })
    }
}

/// One unit of work on pool slot `worker`
async fn crawl_step<T: Transport, E: LinkExtractor>(
    ctx: Arc<CrawlContext<T, E>>,
    worker: WorkerId,
) {
    let entry = match ctx.frontier.next_for(worker) {
        Poll::Entry(entry) => entry,
        Poll::Idle => {
            ctx.frontier.wait_for_work().await;
            return;
        }
        Poll::Finished => return,
    };

    match crawl_page(&ctx, &entry).await {
        Ok(()) => {}
        Err(WebrankError::Graph(e)) => {
            tracing::error!("Link graph failure while crawling {}: {}", entry.url, e);
            ctx.fatal.lock().get_or_insert(e);
            ctx.frontier.shutdown();
        }
        Err(WebrankError::Fetch(e)) if !e.is_network() => {
            ctx.counters.page_failed();
            tracing::debug!("Skipping {}: {}", entry.url, e);
        }
        Err(e) => {
            ctx.counters.page_failed();
            tracing::warn!("Failed to crawl {}: {}", entry.url, e);
        }
    }
}

/// Fetches one page and records every accepted link it contains
async fn crawl_page<T: Transport, E: LinkExtractor>(
    ctx: &CrawlContext<T, E>,
    entry: &FrontierEntry,
) -> Result<(), WebrankError> {
    let crawler = &ctx.config.crawler;
    let page = fetch_page(
        &ctx.transport,
        &entry.url,
        entry.referer.as_deref(),
        &crawler.user_agent,
        crawler.timeout(),
    )
    .await?;
    ctx.counters.page_fetched();

    let hrefs = ctx.extractor.extract(&page.text());
    tracing::debug!(
        "Fetched {} ({} bytes, {} links, depth {})",
        entry.url,
        page.body.len(),
        hrefs.len(),
        entry.depth
    );

    let depth = entry.depth + 1;
    if crawler.max_depth > 0 && depth > crawler.max_depth {
        tracing::trace!("Not following links of {} past max depth", entry.url);
        ctx.counters.links_skipped(hrefs.len() as u64);
        return Ok(());
    }

    for href in hrefs {
        if is_foreign_scheme(&href) {
            tracing::trace!("Not following {}: unsupported scheme", href);
            ctx.counters.links_skipped(1);
            continue;
        }

        let candidate = resolve(&entry.url, &href);
        if !ctx.filter.accepts(&candidate) {
            tracing::trace!("Filtered out {}", candidate);
            ctx.counters.links_skipped(1);
            continue;
        }

        if let Discovery::New(id) = ctx.graph.record_link(&candidate, &entry.url)? {
            tracing::trace!("Discovered {} as node {}", candidate, id);
            ctx.frontier.enqueue(candidate, Some(entry.url.clone()), depth);
        }
        ctx.counters.link_seen();
    }

    Ok(())
}
