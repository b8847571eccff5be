//! Output module for rendering results and crawl statistics
//!
//! This module handles:
//! - JSON rendering of pipeline results as `{"results": [...]}`
//! - Human readable crawl statistics

pub mod stats;

pub use stats::{print_statistics, write_statistics, CrawlStatistics};

use serde::Serialize;
use std::io::Write;

/// Top-level JSON document printed by the CLI
#[derive(Debug, Serialize)]
pub struct ResultsDocument<'a, T> {
    pub results: &'a [T],
}

/// Renders results as pretty JSON wrapped in a `results` key
///
/// # Example
///
/// ```
/// use contact_scout::output::results_json;
/// use contact_scout::EmailOwner;
///
/// let owners = vec![EmailOwner {
///     email: "owner@site.com".to_string(),
///     owner_name: Some("Jane Doe".to_string()),
/// }];
/// let json = results_json(&owners).unwrap();
/// assert!(json.contains("\"owner_name\": \"Jane Doe\""));
/// ```
pub fn results_json<T: Serialize>(results: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ResultsDocument { results })
}

/// Writes the results document followed by a newline
pub fn write_results<W: Write, T: Serialize>(
    out: &mut W,
    results: &[T],
) -> crate::Result<()> {
    let json = results_json(results)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
