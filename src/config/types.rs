use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for webrank
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub rank: RankConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with every default and the given seed
    pub fn with_seed(seed_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::with_seed(seed_url),
            filter: FilterConfig::default(),
            rank: RankConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First page to fetch
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Number of pages fetched in parallel
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bound on every connect, read and write (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum link distance from the seed, 0 for unlimited
    #[serde(rename = "max-depth", default)]
    pub max_depth: u32,

    /// Value of the User-Agent request header
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Number of nodes the link graph reserves up front
    #[serde(
        rename = "initial-graph-capacity",
        default = "default_initial_graph_capacity"
    )]
    pub initial_graph_capacity: usize,
}

impl CrawlerConfig {
    pub fn with_seed(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            workers: default_workers(),
            timeout_secs: default_timeout_secs(),
            max_depth: 0,
            user_agent: default_user_agent(),
            initial_graph_capacity: default_initial_graph_capacity(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Allowlist for discovered URLs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Host patterns (e.g., "example.com" or "*.example.com"); empty allows any host
    #[serde(default)]
    pub hosts: Vec<String>,

    /// Regular expression the full URL must match
    #[serde(default)]
    pub pattern: Option<String>,
}

/// PageRank parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RankConfig {
    /// Probability of following a link rather than jumping to a random page
    #[serde(default = "default_dampening")]
    pub dampening: f64,

    /// L1 change between iterations below which ranking stops
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Hard bound on power iterations
    #[serde(rename = "max-iterations", default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Number of pages reported
    #[serde(rename = "top-n", default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            dampening: default_dampening(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            top_n: default_top_n(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Path of the markdown ranking report; nothing is written when unset
    #[serde(rename = "report-path", default)]
    pub report_path: Option<String>,
}

fn default_workers() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    format!("Mozilla/5.0 (compatible; webrank/{};)", env!("CARGO_PKG_VERSION"))
}

fn default_initial_graph_capacity() -> usize {
    1024
}

fn default_dampening() -> f64 {
    0.85
}

fn default_tolerance() -> f64 {
    1e-7
}

fn default_max_iterations() -> usize {
    1000
}

fn default_top_n() -> usize {
    10
}
