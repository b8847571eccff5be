//! Robots.txt handling module
//!
//! This module provides the link policy gate: one robots.txt fetch per site
//! origin, parsed once and consulted before every page fetch. The gate fails
//! open, so a missing or unreachable robots.txt never stops a crawl.

mod parser;

pub use parser::ParsedRobots;

use crate::url::robots_url;
use reqwest::Client;
use std::time::Duration;

/// Where a gate's rules came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    /// robots.txt was fetched and parsed
    Fetched,
    /// robots.txt could not be retrieved; everything is allowed
    Unavailable,
}

/// Robots.txt policy for a single site origin
#[derive(Debug, Clone)]
pub struct PolicyGate {
    origin: String,
    robots: ParsedRobots,
    source: PolicySource,
}

impl PolicyGate {
    /// Builds a gate from already retrieved robots.txt content
    pub fn from_content(origin: impl Into<String>, content: &str) -> Self {
        Self {
            origin: origin.into(),
            robots: ParsedRobots::from_content(content),
            source: PolicySource::Fetched,
        }
    }

    /// Builds a gate that allows every URL
    pub fn allow_all(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            robots: ParsedRobots::allow_all(),
            source: PolicySource::Unavailable,
        }
    }

    /// Fetches and parses `<origin>/robots.txt`
    ///
    /// Never fails: a transport error, timeout or non-2xx status yields an
    /// allow-all gate.
    ///
    /// # Arguments
    ///
    /// * `client` - The shared HTTP client
    /// * `origin` - Site origin, e.g. `https://example.com`
    /// * `timeout` - Timeout for the robots.txt request
    pub async fn fetch(client: &Client, origin: &str, timeout: Duration) -> Self {
        let Some(url) = robots_url(origin) else {
            tracing::warn!("Cannot build robots.txt URL for origin {}", origin);
            return Self::allow_all(origin);
        };

        tracing::debug!("Fetching {}", url);
        let response = match client.get(url.clone()).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}; allowing all", url, e);
                return Self::allow_all(origin);
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::info!("{} returned HTTP {}; allowing all", url, status.as_u16());
            return Self::allow_all(origin);
        }

        match response.text().await {
            Ok(body) => Self::from_content(origin, &body),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}; allowing all", url, e);
                Self::allow_all(origin)
            }
        }
    }

    /// The origin this gate applies to
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn source(&self) -> PolicySource {
        self.source
    }

    /// Checks if a URL may be fetched by the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The robots.txt product token
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.robots.is_allowed(url, user_agent)
    }
}
