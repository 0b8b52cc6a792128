//! URL handling module for webrank
//!
//! This module provides parsing of `http://` URLs, merging of relative links
//! against the page they were found on, dot-segment simplification and the
//! allowlist filter that decides which discovered URLs are crawled.
//!
//! The canonical form of a discovered link is `simplify(merge(base, link))`;
//! the link graph deduplicates on that string.

mod filter;
mod matcher;
mod merge;
mod parse;
mod simplify;

// Re-export main functions
pub use filter::{domain_filter, UrlFilter};
pub use matcher::matches_wildcard;
pub use merge::merge;
pub use parse::{has_scheme, is_foreign_scheme, link_scheme, parse_url, rewrite_shorthand, ParsedUrl, HTTP_DEFAULT_PORT, HTTP_SCHEME};
pub use simplify::simplify;

/// Resolves `link` against `base` and returns its canonical form
///
/// # Examples
///
/// ```
/// use webrank::url::resolve;
///
/// assert_eq!(resolve("http://x.com/a/b.html", "../c.html"), "http://x.com/c.html");
/// assert_eq!(resolve("http://x.com/a/b.html", "./d/./e.html"), "http://x.com/a/d/e.html");
/// ```
pub fn resolve(base: &str, link: &str) -> String {
    let mut merged = merge(base, link);
    simplify(&mut merged);
    merged
}

/// Index of the first `?` or `#` in `url`, or its length
pub(crate) fn path_end(url: &str) -> usize {
    url.find(['?', '#']).unwrap_or(url.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_parent_segment() {
        assert_eq!(
            resolve("http://x.com/a/b.html", "../c.html"),
            "http://x.com/c.html"
        );
    }

    #[test]
    fn test_resolve_keeps_absolute_links() {
        assert_eq!(
            resolve("http://x.com/a/b.html", "http://y.com/p/../q"),
            "http://y.com/q"
        );
    }

    #[test]
    fn test_resolve_cannot_escape_root() {
        assert_eq!(
            resolve("http://x.com/a.html", "../../../b.html"),
            "http://x.com/b.html"
        );
    }

    #[test]
    fn test_path_end() {
        assert_eq!(path_end("http://x.com/a?q#f"), 14);
        assert_eq!(path_end("http://x.com/a#f?q"), 14);
        assert_eq!(path_end("http://x.com/a"), 14);
    }
}
