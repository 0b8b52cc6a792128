use crate::config::FilterConfig;
use crate::url::matcher::matches_wildcard;
use crate::url::parse::parse_url;
use crate::ConfigError;
use regex::Regex;

/// Decides which discovered URLs the crawler may follow
///
/// A URL is accepted when it parses as an `http://` URL, its host matches one
/// of the host patterns (an empty list allows every host), and, if a pattern
/// is configured, the whole URL matches it.
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    hosts: Vec<String>,
    pattern: Option<Regex>,
}

impl UrlFilter {
    /// Creates a filter from host patterns and an optional URL regex
    pub fn new(hosts: Vec<String>, pattern: Option<&str>) -> Result<Self, ConfigError> {
        let pattern = pattern
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    ConfigError::InvalidPattern(format!("Invalid url pattern '{}': {}", p, e))
                })
            })
            .transpose()?;

        Ok(Self { hosts, pattern })
    }

    /// Creates a filter from the `[filter]` section of the configuration
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        Self::new(config.hosts.clone(), config.pattern.as_deref())
    }

    /// Returns true if `url` may be crawled
    pub fn accepts(&self, url: &str) -> bool {
        let Ok(parsed) = parse_url(url) else {
            return false;
        };

        let host_allowed = self.hosts.is_empty()
            || self
                .hosts
                .iter()
                .any(|pattern| matches_wildcard(pattern, parsed.host()));
        if !host_allowed {
            return false;
        }

        self.pattern.as_ref().map_or(true, |re| re.is_match(url))
    }
}

/// Applies the allowlist `filter` to `url`
pub fn domain_filter(url: &str, filter: &UrlFilter) -> bool {
    filter.accepts(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_accepts_any_http_url() {
        let filter = UrlFilter::default();
        assert!(filter.accepts("http://anything.org/x"));
        assert!(!filter.accepts("https://anything.org/x"));
        assert!(!filter.accepts("mailto:someone@example.com"));
    }

    #[test]
    fn test_host_allowlist() {
        let filter = UrlFilter::new(vec!["*.example.com".to_string()], None).unwrap();
        assert!(filter.accepts("http://example.com/"));
        assert!(filter.accepts("http://docs.example.com:8080/a"));
        assert!(!filter.accepts("http://example.org/"));
    }

    #[test]
    fn test_path_pattern() {
        let filter = UrlFilter::new(
            vec!["10.108.106.36".to_string()],
            Some(r"^http://10\.108\.106\.36.*\.(htm|html)$"),
        )
        .unwrap();

        assert!(domain_filter(
            "http://10.108.106.36/pcourse/index.html",
            &filter
        ));
        assert!(!domain_filter("http://10.108.106.36/logo.png", &filter));
        assert!(!domain_filter("http://10.0.0.1/index.html", &filter));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = UrlFilter::new(vec![], Some("(unclosed"));
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_from_config() {
        let config = FilterConfig {
            hosts: vec!["example.com".to_string()],
            pattern: Some(r"\.html$".to_string()),
        };
        let filter = UrlFilter::from_config(&config).unwrap();
        assert!(filter.accepts("http://example.com/a.html"));
        assert!(!filter.accepts("http://example.com/a.pdf"));
    }
}
