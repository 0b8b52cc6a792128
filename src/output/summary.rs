use crate::crawler::CrawlReport;
use crate::graph::NodeId;
use crate::output::CrawlStats;
use chrono::{DateTime, Utc};

/// One row of the ranking table
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPage {
    pub id: NodeId,
    pub url: String,
    pub score: f64,
    pub inbound: usize,
    pub out_degree: u32,
}

/// Everything the ranking outputs need, detached from the graph
#[derive(Debug, Clone)]
pub struct RankingSummary {
    pub seed_url: String,
    pub config_hash: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub total_pages: usize,
    pub total_links: usize,
    pub iterations: usize,
    pub converged: bool,
    pub delta: f64,
    pub stats: CrawlStats,
    pub pages: Vec<RankedPage>,
}

impl RankingSummary {
    /// Builds the summary for the `top_n` best pages of `report`
    pub fn from_report(report: &CrawlReport, top_n: usize, config_hash: Option<String>) -> Self {
        let pages = report
            .outcome
            .top(top_n)
            .into_iter()
            .map(|(id, score)| RankedPage {
                id,
                url: report.graph.url(id).unwrap_or_default().to_string(),
                score,
                inbound: report.graph.inbound(id).len(),
                out_degree: report.graph.out_degree(id),
            })
            .collect();

        Self {
            seed_url: report.seed_url.clone(),
            config_hash,
            generated_at: Utc::now(),
            total_pages: report.graph.len(),
            total_links: report.graph.edge_count(),
            iterations: report.outcome.iterations,
            converged: report.outcome.converged,
            delta: report.outcome.delta,
            stats: report.stats.clone(),
            pages,
        }
    }
}

/// Prints the ranking table to stdout
pub fn print_ranking(summary: &RankingSummary) {
    println!("=== PageRank ===\n");
    println!(
        "  {} pages, {} links, {} iterations{}",
        summary.total_pages,
        summary.total_links,
        summary.iterations,
        if summary.converged {
            ""
        } else {
            " (not converged)"
        }
    );
    println!();

    if summary.pages.is_empty() {
        println!("  No pages ranked.");
        println!();
        return;
    }

    println!("  {:>4}  {:>12}  {:>7}  {}", "#", "score", "inbound", "url");
    for (position, page) in summary.pages.iter().enumerate() {
        println!(
            "  {:>4}  {:>12.8}  {:>7}  {}",
            position + 1,
            page.score,
            page.inbound,
            page.url
        );
    }
    println!();
}
