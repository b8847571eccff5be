//! URL handling module for Contact-Scout
//!
//! This module provides URL normalization for frontier keys and origin
//! extraction for the per-site robots.txt gates.

mod normalize;

pub use normalize::{normalize_parsed, normalize_url};

use url::Url;

/// Extracts the origin (scheme, host and non-default port) of a URL
///
/// Returns `None` for URLs without a host, whose origin is opaque.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use contact_scout::url::extract_origin;
///
/// let url = Url::parse("https://Example.com/about/team").unwrap();
/// assert_eq!(extract_origin(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_origin(&url), Some("http://127.0.0.1:8080".to_string()));
/// ```
pub fn extract_origin(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

/// Builds the robots.txt location for an origin
pub fn robots_url(origin: &str) -> Option<Url> {
    Url::parse(origin).ok()?.join("/robots.txt").ok()
}
