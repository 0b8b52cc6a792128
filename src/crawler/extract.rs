//! Link extraction from fetched HTML

use crate::url::is_foreign_scheme;
use scraper::{Html, Selector};

/// Pulls candidate link targets out of a page body
///
/// Returned hrefs are raw: they still have to be resolved against the page
/// URL and filtered.
pub trait LinkExtractor: Send + Sync + 'static {
    fn extract(&self, html: &str) -> Vec<String>;
}

/// Collects the `href` of every element carrying one, in document order
///
/// Skips empty values, same-page anchors (`#...`) and any link with a scheme
/// other than `http:` (`https:`, `ftp:`, `mailto:`, `javascript:` and so on).
#[derive(Debug, Clone, Copy, Default)]
pub struct HrefExtractor;

impl LinkExtractor for HrefExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Ok(selector) = Selector::parse("[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::trim)
            .filter(|href| is_followable(href))
            .map(str::to_string)
            .collect()
    }
}

fn is_followable(href: &str) -> bool {
    !href.is_empty() && !href.starts_with('#') && !is_foreign_scheme(href)
}
