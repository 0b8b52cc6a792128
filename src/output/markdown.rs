//! Markdown ranking report

use crate::output::{OutputError, OutputResult, RankingSummary};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report for `summary` to `output_path`
pub fn write_markdown_report(summary: &RankingSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(summary);

    let write = |path: &Path| -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(markdown.as_bytes())?;
        file.flush()
    };

    write(output_path).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })?;

    tracing::info!("Wrote ranking report to {}", output_path.display());
    Ok(())
}

/// Formats a ranking summary as markdown
pub fn format_markdown_report(summary: &RankingSummary) -> String {
    let mut md = String::new();

    md.push_str("# webrank Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", summary.seed_url));
    md.push_str(&format!(
        "- **Started**: {}\n",
        summary.stats.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        summary.stats.elapsed.as_secs_f64()
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Crawl Statistics\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages in graph | {} |\n", summary.total_pages));
    md.push_str(&format!("| Links in graph | {} |\n", summary.total_links));
    md.push_str(&format!("| Pages fetched | {} |\n", summary.stats.pages_fetched));
    md.push_str(&format!("| Pages failed | {} |\n", summary.stats.pages_failed));
    md.push_str(&format!("| Links skipped | {} |\n", summary.stats.links_skipped));
    md.push_str(&format!(
        "| Frontier high-water mark | {} |\n",
        summary.stats.frontier_high_water
    ));
    md.push_str(&format!(
        "| Success rate | {:.2}% |\n\n",
        summary.stats.success_rate()
    ));

    md.push_str("## PageRank\n\n");
    md.push_str(&format!(
        "{} iterations, final delta {:.3e}{}.\n\n",
        summary.iterations,
        summary.delta,
        if summary.converged {
            ""
        } else {
            " (iteration cap reached before convergence)"
        }
    ));

    if summary.pages.is_empty() {
        md.push_str("No pages were ranked.\n");
        return md;
    }

    md.push_str("| # | Score | Inbound | Outbound | URL |\n");
    md.push_str("|---|-------|---------|----------|-----|\n");
    for (position, page) in summary.pages.iter().enumerate() {
        md.push_str(&format!(
            "| {} | {:.8} | {} | {} | {} |\n",
            position + 1,
            page.score,
            page.inbound,
            page.out_degree,
            page.url
        ));
    }

    md
}
