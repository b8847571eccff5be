//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded timeouts and redirects
//! - HTML parsing and link extraction
//! - The breadth-first frontier and visited set
//! - Overall crawl coordination under a wall-clock budget

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlReport, CrawledPage, Crawler, StopReason};
pub use fetcher::{
    build_http_client, fetch_page, is_textual_content_type, FetchError, FetchedPage,
    MAX_REDIRECTS,
};
pub use frontier::{CrawlTarget, Frontier};
pub use parser::{parse_html, DiscoveredLink, ParsedPage};

