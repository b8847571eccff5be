//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the shared HTTP client with the crawler's user agent
//! - Single bounded-timeout GET requests
//! - Content-Type screening (only textual pages are collected)
//! - Error classification into page states

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::PageState;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// Upper bound for establishing a connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Decoded page body
    pub body: String,
}

/// Why a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("non-textual content type: {content_type}")]
    NonTextual { content_type: String },

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Maps the failure to the terminal state recorded for the URL
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Timeout | Self::Connect(_) => PageState::Unreachable,
            Self::Status { status } if *status == 404 || *status == 410 => PageState::DeadLink,
            Self::Status { .. } => PageState::HttpError,
            Self::NonTextual { .. } => PageState::ContentMismatch,
            Self::Body(_) | Self::Transport(_) => PageState::Failed,
        }
    }

    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client carries the crawler's User-Agent, the per-request timeout and
/// a bounded redirect policy. It is cheap to clone and shared by the page
/// fetcher, the robots.txt gate and the owner resolver.
///
/// # Example
///
/// ```no_run
/// use contact_scout::config::Config;
/// use contact_scout::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = crawler.request_timeout();

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single page
///
/// # Outcome Mapping
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with textual or missing Content-Type | `Ok(FetchedPage)` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection refused, DNS, TLS | `FetchError::Connect` |
/// | Any non-2xx final status | `FetchError::Status` |
/// | Binary Content-Type | `FetchError::NonTextual` |
/// | Undecodable body | `FetchError::Body` |
///
/// Nothing is retried; the caller marks the URL as visited either way.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(FetchError::from_reqwest)?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(ct) = &content_type {
        if !is_textual_content_type(ct) {
            return Err(FetchError::NonTextual {
                content_type: ct.clone(),
            });
        }
    }

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Body(e.to_string())
        }
    })?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

/// Returns true if the Content-Type names a textual document
///
/// Textual means `text/*`, XHTML, XML and any `+xml` type. An empty value is
/// treated as textual.
pub fn is_textual_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime.is_empty()
        || mime.starts_with("text/")
        || mime == "application/xhtml+xml"
        || mime == "application/xml"
        || mime.ends_with("+xml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_http_client() {
        let config = Config::default();
        let client = build_http_client(&config.user_agent, &config.crawler);
        assert!(client.is_ok());
    }

    #[test]
    fn test_textual_content_types() {
        assert!(is_textual_content_type("text/html"));
        assert!(is_textual_content_type("text/html; charset=utf-8"));
        assert!(is_textual_content_type("TEXT/PLAIN"));
        assert!(is_textual_content_type("application/xhtml+xml"));
        assert!(is_textual_content_type("application/rss+xml"));
        assert!(is_textual_content_type(""));
    }

    #[test]
    fn test_binary_content_types() {
        assert!(!is_textual_content_type("application/pdf"));
        assert!(!is_textual_content_type("image/png"));
        assert!(!is_textual_content_type("application/octet-stream"));
    }

    #[test]
    fn test_error_page_states() {
        assert_eq!(FetchError::Timeout.page_state(), PageState::Unreachable);
        assert_eq!(
            FetchError::Connect("refused".into()).page_state(),
            PageState::Unreachable
        );
        assert_eq!(
            FetchError::Status { status: 404 }.page_state(),
            PageState::DeadLink
        );
        assert_eq!(
            FetchError::Status { status: 410 }.page_state(),
            PageState::DeadLink
        );
        assert_eq!(
            FetchError::Status { status: 503 }.page_state(),
            PageState::HttpError
        );
        assert_eq!(
            FetchError::NonTextual {
                content_type: "image/png".into()
            }
            .page_state(),
            PageState::ContentMismatch
        );
        assert_eq!(FetchError::Body("eof".into()).page_state(), PageState::Failed);
    }
}
