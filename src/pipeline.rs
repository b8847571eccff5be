//! Crawl, extract and resolve in one call
//!
//! The pipeline owns the shared HTTP client, the crawler and the owner
//! resolver. Data flows strictly forward: pages from the crawler, email
//! contexts from every page in page order, then one owner per context.

use crate::config::Config;
use crate::crawler::{build_http_client, CrawlReport, Crawler};
use crate::extract::{extract_emails, EmailContext};
use crate::resolver::{OwnerResolver, OwnerResult};
use crate::ScoutError;
use serde::{Deserialize, Serialize};

/// Final record: an email address and who it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailOwner {
    pub email: String,

    /// `None` when the owner could not be determined
    pub owner_name: Option<String>,
}

/// Crawl pipeline bound to one configuration
#[derive(Debug)]
pub struct Pipeline {
    crawler: Crawler,
    resolver: OwnerResolver,
}

impl Pipeline {
    /// Builds the HTTP client, crawler and resolver
    ///
    /// Fails with a configuration error when no resolver credential is set,
    /// so nothing is crawled that could not be resolved afterwards.
    pub fn new(config: Config) -> Result<Self, ScoutError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let resolver = OwnerResolver::new(&config.resolver, &client)?;
        let crawler = Crawler::new(&config, client);

        Ok(Self { crawler, resolver })
    }

    /// Crawls from `seed` and returns every email found with its owner
    ///
    /// Only a malformed seed is an error. Entries appear in page order, then
    /// in extraction order within each page.
    pub async fn crawl(&self, seed: &str) -> Result<Vec<EmailOwner>, ScoutError> {
        let (owners, _report) = self.crawl_with_report(seed).await?;
        Ok(owners)
    }

    /// Like [`Pipeline::crawl`], also returning the crawl report
    pub async fn crawl_with_report(
        &self,
        seed: &str,
    ) -> Result<(Vec<EmailOwner>, CrawlReport), ScoutError> {
        let report = self.crawler.crawl(seed).await?;

        if report.pages.is_empty() {
            tracing::info!("No pages collected from {}", report.seed);
            return Ok((Vec::new(), report));
        }

        let found: Vec<EmailContext> = report
            .pages
            .iter()
            .flat_map(|page| extract_emails(&page.body))
            .collect();

        if found.is_empty() {
            tracing::info!("No email addresses found on {} pages", report.pages.len());
            return Ok((Vec::new(), report));
        }

        tracing::info!(
            "Found {} email occurrences on {} pages",
            found.len(),
            report.pages.len()
        );

        let contexts: Vec<String> = found.iter().map(|e| e.context.clone()).collect();
        let resolved = self.resolver.resolve(&contexts).await;

        Ok((merge_owners(found, resolved), report))
    }

    /// Resolves owners for contexts supplied directly
    pub async fn resolve_owners(&self, contexts: &[String]) -> Vec<OwnerResult> {
        self.resolver.resolve(contexts).await
    }
}

/// Pairs each extracted email with the owner resolved for its context
///
/// Both sequences are in the same order; a missing result counts as unknown.
fn merge_owners(found: Vec<EmailContext>, resolved: Vec<OwnerResult>) -> Vec<EmailOwner> {
    let mut resolved = resolved.into_iter();
    found
        .into_iter()
        .map(|entry| EmailOwner {
            email: entry.email,
            owner_name: resolved.next().and_then(|r| r.owner),
        })
        .collect()
}
