use crate::config::types::{Config, CrawlerConfig, FilterConfig, OutputConfig, RankConfig};
use crate::url::{parse_url, UrlFilter};
use crate::ConfigError;

/// Upper bound on the worker pool
const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_filter_config(&config.filter)?;
    validate_seed_allowed(config)?;
    validate_rank_config(&config.rank)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    parse_url(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url: {}", e)))?;

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    // the value goes verbatim into a request header
    if config.user_agent.contains(['\r', '\n']) {
        return Err(ConfigError::Validation(
            "user-agent cannot contain line breaks".to_string(),
        ));
    }

    if config.initial_graph_capacity < 1 {
        return Err(ConfigError::Validation(
            "initial-graph-capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the host patterns and the URL regex
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for host in &config.hosts {
        validate_host_pattern(host)?;
    }

    UrlFilter::from_config(config).map(|_| ())
}

/// The seed has to pass the filter, otherwise nothing it links to could either
fn validate_seed_allowed(config: &Config) -> Result<(), ConfigError> {
    let filter = UrlFilter::from_config(&config.filter)?;
    if !filter.accepts(&config.crawler.seed_url) {
        return Err(ConfigError::Validation(format!(
            "seed-url '{}' is rejected by the [filter] section",
            config.crawler.seed_url
        )));
    }
    Ok(())
}

/// Validates PageRank parameters
fn validate_rank_config(config: &RankConfig) -> Result<(), ConfigError> {
    if !(config.dampening > 0.0 && config.dampening < 1.0) {
        return Err(ConfigError::Validation(format!(
            "dampening must be strictly between 0 and 1, got {}",
            config.dampening
        )));
    }

    if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
        return Err(ConfigError::Validation(format!(
            "tolerance must be a positive number, got {}",
            config.tolerance
        )));
    }

    if config.max_iterations < 1 {
        return Err(ConfigError::Validation(
            "max-iterations must be >= 1".to_string(),
        ));
    }

    if config.top_n < 1 {
        return Err(ConfigError::Validation("top-n must be >= 1".to_string()));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.as_deref() == Some("") {
        return Err(ConfigError::Validation(
            "report-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a host pattern (supports a leading "*." wildcard)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Host pattern cannot be empty".to_string(),
        ));
    }

    let host = pattern.strip_prefix("*.").unwrap_or(pattern);
    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "Host pattern '{}' has no host after the wildcard",
            pattern
        )));
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.') || host.ends_with('.') || host.starts_with('-') || host.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot start or end with '.' or '-'",
            host
        )));
    }

    if host.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' cannot contain consecutive dots",
            host
        )));
    }

    Ok(())
}
