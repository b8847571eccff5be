//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - Anchor links to follow (resolved to absolute URLs)
//! - Pagination hints on those links
//! - Page title

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// A link discovered on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL of the link target
    pub url: Url,

    /// True when the anchor text or `rel` marks it as a "next" page
    pub is_pagination: bool,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// All followable links found on the page, in document order
    pub links: Vec<DiscoveredLink>,
}

impl ParsedPage {
    /// Number of links flagged as pagination
    pub fn pagination_count(&self) -> usize {
        self.links.iter().filter(|l| l.is_pagination).count()
    }
}

/// Parses HTML content and extracts links and metadata
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that does not resolve to http or https
///
/// HTML parsing is error-tolerant, so this never fails; malformed markup
/// simply yields fewer links.
///
/// # Example
///
/// ```
/// use contact_scout::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Team</title></head><body><a href="/contact">Contact</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/about/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Team".to_string()));
/// assert_eq!(parsed.links[0].url.as_str(), "https://example.com/contact");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<DiscoveredLink> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?;
            let url = resolve_link(href, base_url)?;
            Some(DiscoveredLink {
                url,
                is_pagination: is_pagination_link(&element),
            })
        })
        .collect()
}

/// Detects "next page" anchors by text or `rel` token
fn is_pagination_link(element: &ElementRef<'_>) -> bool {
    let rel_next = element
        .value()
        .attr("rel")
        .map(|rel| {
            rel.split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("next"))
        })
        .unwrap_or(false);

    rel_next
        || element
            .text()
            .collect::<String>()
            .to_lowercase()
            .contains("next")
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
