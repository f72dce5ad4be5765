use crate::url::DomainMatch;
use serde::Deserialize;

/// Main configuration structure for Sitemap-Scribe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the crawl starts and which URLs belong to it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Sitemap sources, each a local path or an http(s) URL
    #[serde(default)]
    pub sitemaps: Vec<String>,

    /// Domain that crawled URLs must belong to
    #[serde(default)]
    pub base_domain: String,

    /// How `base_domain` is compared against candidate URLs
    #[serde(default)]
    pub domain_match: DomainMatch,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Follow internal links found on crawled pages
    pub recursive: bool,

    /// Maximum link depth from a seed URL
    pub max_depth: u32,

    /// Probe depth-0 origins for additional sitemaps
    pub auto_discover_sitemaps: bool,

    /// Run a second pass over navigation links never reached by body links
    pub navigation_sweep: bool,

    /// Pause between successive requests (seconds)
    pub delay_secs: f64,

    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,

    /// Words per text chunk
    pub chunk_size: usize,

    /// Skip URLs disallowed by robots.txt and honor its Crawl-delay
    pub respect_robots_txt: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: 5,
            auto_discover_sitemaps: true,
            navigation_sweep: true,
            delay_secs: 1.0,
            request_timeout_ms: 30_000,
            chunk_size: 500,
            respect_robots_txt: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitemap-scribe".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Directory receiving markdown pages and the JSON corpus
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
        }
    }
}
