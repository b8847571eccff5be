//! Crawl statistics
//!
//! This module summarizes a [`CrawlReport`] and renders it for humans.

use crate::crawler::{CrawlReport, StopReason};
use crate::state::PageState;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Seed URL as requested
    pub seed: String,

    /// When the crawl started (RFC 3339)
    pub started_at: String,

    pub elapsed: Duration,

    pub stop_reason: StopReason,

    /// Total URLs taken off the frontier
    pub total_pages: usize,

    /// Count of URLs by terminal state
    pub pages_by_state: BTreeMap<PageState, usize>,

    /// Links found on collected pages, before deduplication
    pub total_links: usize,

    /// Links flagged as "next page"
    pub pagination_links: usize,

    /// URLs still queued when the crawl stopped
    pub frontier_remaining: usize,

    /// Email occurrences extracted, when extraction ran
    pub emails_found: Option<usize>,

    /// Owners resolved, when resolution ran
    pub owners_resolved: Option<usize>,
}

impl CrawlStatistics {
    /// Builds statistics from a finished crawl
    pub fn from_report(report: &CrawlReport) -> Self {
        Self {
            seed: report.seed.to_string(),
            started_at: report.started_at.to_rfc3339(),
            elapsed: report.elapsed,
            stop_reason: report.stop_reason,
            total_pages: report.total_processed(),
            pages_by_state: report.outcomes.clone(),
            total_links: report.links_discovered,
            pagination_links: report.pagination_links,
            frontier_remaining: report.frontier_remaining,
            emails_found: None,
            owners_resolved: None,
        }
    }

    /// Adds pipeline totals
    pub fn with_results(mut self, emails_found: usize, owners_resolved: usize) -> Self {
        self.emails_found = Some(emails_found);
        self.owners_resolved = Some(owners_resolved);
        self
    }

    fn count_where(&self, pred: impl Fn(&PageState) -> bool) -> usize {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| pred(state))
            .map(|(_, count)| count)
            .sum()
    }

    /// Count of URLs that ended in an error state
    pub fn error_count(&self) -> usize {
        self.count_where(PageState::is_error)
    }

    /// Count of URLs skipped without being collected
    pub fn skipped_count(&self) -> usize {
        self.count_where(PageState::is_skipped)
    }

    /// Count of URLs whose content was collected
    pub fn processed_count(&self) -> usize {
        self.count_where(PageState::is_success)
    }

    /// Percentage of URLs that were processed successfully
    pub fn success_rate(&self) -> f64 {
        if self.total_pages > 0 {
            (self.processed_count() as f64 / self.total_pages as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Writes statistics in a human readable layout
pub fn write_statistics<W: Write>(out: &mut W, stats: &CrawlStatistics) -> io::Result<()> {
    writeln!(out, "=== Crawl Statistics ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Seed: {}", stats.seed)?;
    writeln!(out, "  Started: {}", stats.started_at)?;
    writeln!(out, "  Duration: {:.1}s", stats.elapsed.as_secs_f64())?;
    writeln!(out, "  Stopped: {}", stats.stop_reason.as_str())?;
    writeln!(out, "  URLs processed: {}", stats.total_pages)?;
    writeln!(
        out,
        "  Links found: {} ({} pagination)",
        stats.total_links, stats.pagination_links
    )?;
    writeln!(out, "  Still queued: {}", stats.frontier_remaining)?;
    writeln!(out)?;

    writeln!(out, "Pages by State:")?;
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (state, count) in state_counts {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        writeln!(out, "  {}: {} ({:.1}%)", state, count, percentage)?;
    }
    writeln!(out)?;

    if let Some(emails) = stats.emails_found {
        writeln!(out, "Emails found: {}", emails)?;
    }
    if let Some(owners) = stats.owners_resolved {
        writeln!(out, "Owners resolved: {}", owners)?;
    }

    writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} URLs fetched, {} skipped, {} errors)",
        stats.success_rate(),
        stats.processed_count(),
        stats.total_pages,
        stats.skipped_count(),
        stats.error_count()
    )
}

/// Prints statistics to stderr, keeping stdout for results
pub fn print_statistics(stats: &CrawlStatistics) -> io::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_statistics(&mut out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use url::Url;

    fn report() -> CrawlReport {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(PageState::Processed, 3);
        outcomes.insert(PageState::Disallowed, 1);
        outcomes.insert(PageState::DeadLink, 1);

        CrawlReport {
            seed: Url::parse("https://example.com/").unwrap(),
            pages: Vec::new(),
            outcomes,
            links_discovered: 12,
            pagination_links: 2,
            frontier_remaining: 0,
            started_at: Utc::now(),
            elapsed: Duration::from_millis(1500),
            stop_reason: StopReason::FrontierExhausted,
        }
    }

    #[test]
    fn test_from_report() {
        let stats = CrawlStatistics::from_report(&report());
        assert_eq!(stats.total_pages, 5);
        assert_eq!(stats.total_links, 12);
        assert_eq!(stats.error_count(), 1);
        assert!((stats.success_rate() - 60.0).abs() < 1e-9);
        assert_eq!(stats.emails_found, None);
    }

    #[test]
    fn test_write_statistics() {
        let stats = CrawlStatistics::from_report(&report()).with_results(4, 3);
        let mut buf = Vec::new();
        write_statistics(&mut buf, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Seed: https://example.com/"));
        assert!(text.contains("Stopped: frontier exhausted"));
        assert!(text.contains("processed: 3 (60.0%)"));
        assert!(text.contains("disallowed: 1 (20.0%)"));
        assert!(text.contains("Emails found: 4"));
        assert!(text.contains("Owners resolved: 3"));
        assert!(text.contains("Success Rate: 60.0% (3 / 5 URLs fetched, 1 skipped, 1 errors)"));
    }

    #[test]
    fn test_duplicates_count_as_skipped() {
        let mut with_duplicate = report();
        with_duplicate.outcomes.insert(PageState::Duplicate, 2);
        let stats = CrawlStatistics::from_report(&with_duplicate);

        assert_eq!(stats.total_pages, 7);
        assert_eq!(stats.processed_count(), 3);
        assert_eq!(stats.skipped_count(), 3);
        assert_eq!(stats.error_count(), 1);
    }

    #[test]
    fn test_empty_crawl() {
        let mut empty = report();
        empty.outcomes.clear();
        let stats = CrawlStatistics::from_report(&empty);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
