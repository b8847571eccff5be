use serde::Deserialize;
use std::time::Duration;

/// Default owner resolution endpoint
pub const DEFAULT_RESOLVER_ENDPOINT: &str = "https://api.gpt4o-mini.com/v1/identify";

/// Main configuration structure for Contact-Scout
///
/// Built once at start-up and shared read-only with every pipeline run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub resolver: ResolverConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Wall-clock budget for one crawl (seconds)
    #[serde(rename = "crawl-budget-secs")]
    pub crawl_budget_secs: u64,

    /// Timeout for a single page or robots.txt request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Stop after this many pages have been collected
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,

    /// Drop discovered links that leave the seed's origin
    #[serde(rename = "same-origin-only")]
    pub same_origin_only: bool,
}

impl CrawlerConfig {
    pub fn crawl_budget(&self) -> Duration {
        Duration::from_secs(self.crawl_budget_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            crawl_budget_secs: 1800,
            request_timeout_secs: 10,
            max_pages: None,
            same_origin_only: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the full User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ContactScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// External owner resolution service configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Endpoint receiving batches of email contexts
    pub endpoint: String,

    /// Bearer credential for the endpoint
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// Number of contexts submitted per request
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Timeout for one batch request (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the credential if one is set and not blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RESOLVER_ENDPOINT.to_string(),
            api_key: None,
            batch_size: 10,
            timeout_secs: 10,
        }
    }
}

// Keep the credential out of debug output and logs.
impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("batch_size", &self.batch_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
