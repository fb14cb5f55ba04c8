use serde::Deserialize;
use std::time::Duration;

/// Namespace shared by every element of a sitemaps.org document
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Main configuration structure for Sitemap-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inline base URLs; when non-empty the input file is not read
    pub sites: Vec<String>,
    pub input: InputConfig,
    pub sitemap: SitemapConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Base URL input file configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the CSV file listing base URLs
    pub path: String,

    /// Header of the column holding the base URLs
    pub column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: "base_urls.csv".to_string(),
            column: "url".to_string(),
        }
    }
}

/// Sitemap request and parsing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Suffix appended to every base URL to form the sitemap request
    pub path: String,

    /// How the document root is checked
    #[serde(rename = "root-check")]
    pub root_check: RootCheck,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            path: "/sitemap.xml".to_string(),
            root_check: RootCheck::default(),
        }
    }
}

/// Root element check applied before the children of a sitemap are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootCheck {
    /// Warns and yields nothing when the root is the bare, un-namespaced
    /// `urlset`; every other root is processed
    #[default]
    Legacy,

    /// Warns and yields nothing unless the root is the namespaced `urlset`
    Strict,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every sitemap request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds; `None` keeps the transport default
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Follow redirects instead of reporting them as fetch failures
    #[serde(rename = "follow-redirects")]
    pub follow_redirects: bool,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("sitemap-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            follow_redirects: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file receiving `site,url` rows
    pub path: String,

    /// Character used to quote fields that need it
    #[serde(rename = "quote-char")]
    pub quote_char: char,

    /// Write each flush to a sibling temp file and rename it into place
    #[serde(rename = "atomic-write")]
    pub atomic_write: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "sites.csv".to_string(),
            quote_char: '"',
            atomic_write: true,
        }
    }
}
