//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Seed validation and frontier setup
//! - Per-origin robots.txt gates
//! - Fetching, parsing and link admission
//! - The wall-clock crawl budget and optional page cap
//!
//! Fetches are awaited one at a time; serial fetching is the crawler's
//! politeness policy.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{fetch_page, FetchedPage};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::parser::{parse_html, DiscoveredLink};
use crate::robots::PolicyGate;
use crate::state::PageState;
use crate::ScoutError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use url::Url;

/// A page whose content was collected
#[derive(Debug, Clone)]
pub struct CrawledPage {
    /// Final URL after redirects
    pub url: Url,

    /// Page title, when the body is HTML with a non-empty <title>
    pub title: Option<String>,

    /// Raw textual body
    pub body: String,
}

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every reachable URL was processed
    FrontierExhausted,
    /// The wall-clock budget ran out; the result is partial
    BudgetExhausted,
    /// `crawler.max-pages` pages were collected
    PageLimit,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FrontierExhausted => "frontier exhausted",
            Self::BudgetExhausted => "budget exhausted",
            Self::PageLimit => "page limit reached",
        }
    }
}

/// Everything a crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Seed URL as requested
    pub seed: Url,

    /// Collected pages in fetch order
    pub pages: Vec<CrawledPage>,

    /// Terminal state counts for every URL taken off the frontier
    pub outcomes: BTreeMap<PageState, usize>,

    /// Links found on collected pages, before deduplication
    pub links_discovered: usize,

    /// How many of those links looked like "next page" links
    pub pagination_links: usize,

    /// URLs still queued when the crawl stopped
    pub frontier_remaining: usize,

    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

impl CrawlReport {
    /// True when the crawl was cut short by the wall-clock budget
    pub fn budget_exhausted(&self) -> bool {
        self.stop_reason == StopReason::BudgetExhausted
    }

    /// Count of URLs that ended in `state`
    pub fn count(&self, state: PageState) -> usize {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }

    /// Total URLs taken off the frontier
    pub fn total_processed(&self) -> usize {
        self.outcomes.values().sum()
    }
}

/// Breadth-first crawler bound to one configuration and HTTP client
#[derive(Debug, Clone)]
pub struct Crawler {
    client: Client,
    settings: CrawlerConfig,
    /// robots.txt product token
    robots_agent: String,
}

impl Crawler {
    /// Creates a crawler sharing `client`
    ///
    /// The client is expected to come from
    /// [`build_http_client`](crate::crawler::build_http_client) so it carries
    /// the crawler's User-Agent and request timeout.
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            client,
            settings: config.crawler.clone(),
            robots_agent: config.user_agent.crawler_name.clone(),
        }
    }

    /// Crawls everything reachable from `seed`
    ///
    /// Only a malformed seed is an error. Fetch failures are recorded in
    /// [`CrawlReport::outcomes`] and skipped; running out of budget returns
    /// whatever was collected so far.
    pub async fn crawl(&self, seed: &str) -> Result<CrawlReport, ScoutError> {
        let seed_target = parse_seed(seed)?;
        let seed_url = seed_target.url.clone();

        let started_at = Utc::now();
        let start_time = Instant::now();
        let budget = self.settings.crawl_budget();

        tracing::info!("Starting crawl from {} (budget {:?})", seed_url, budget);

        let mut frontier = Frontier::new(seed_target);
        let mut gates: HashMap<String, PolicyGate> = HashMap::new();
        let mut pages: Vec<CrawledPage> = Vec::new();
        let mut links_discovered = 0;
        let mut pagination_links = 0;

        let stop_reason = loop {
            if self
                .settings
                .max_pages
                .is_some_and(|max| pages.len() >= max)
            {
                break StopReason::PageLimit;
            }

            if frontier.is_empty() {
                break StopReason::FrontierExhausted;
            }

            if start_time.elapsed() > budget {
                tracing::info!(
                    "Crawl budget of {:?} exhausted with {} URLs still queued",
                    budget,
                    frontier.len()
                );
                break StopReason::BudgetExhausted;
            }

            let Some(target) = frontier.pop() else {
                break StopReason::FrontierExhausted;
            };

            if frontier.is_visited(target.key()) {
                continue;
            }

            let gate = self.gate_for(&mut gates, &target.origin).await;
            if !gate.is_allowed(target.url.as_str(), &self.robots_agent) {
                tracing::info!("URL {} disallowed by robots.txt", target.url);
                frontier.finish(&target, PageState::Disallowed);
                continue;
            }

            tracing::debug!("Fetching {}", target.url);
            match fetch_page(&self.client, &target.url).await {
                Ok(page) => {
                    let final_key = redirect_key(&target, &page);
                    if let Some(key) = &final_key {
                        if frontier.is_visited(key) {
                            tracing::debug!(
                                "{} redirected to already visited {}",
                                target.url,
                                page.final_url
                            );
                            frontier.finish(&target, PageState::Duplicate);
                            continue;
                        }
                    }

                    frontier.finish(&target, PageState::Processed);
                    if let Some(key) = &final_key {
                        frontier.mark_alias(key);
                    }

                    let parsed = parse_html(&page.body, &page.final_url);
                    links_discovered += parsed.links.len();
                    pagination_links += parsed.pagination_count();
                    self.admit_links(&mut frontier, &target, &page, &parsed.links);

                    pages.push(CrawledPage {
                        url: page.final_url,
                        title: parsed.title,
                        body: page.body,
                    });

                    if pages.len() % 10 == 0 {
                        tracing::info!(
                            "Progress: {} pages collected, {} in frontier",
                            pages.len(),
                            frontier.len()
                        );
                    }
                }
                Err(e) => {
                    let state = e.page_state();
                    tracing::warn!("Failed to fetch {}: {} ({})", target.url, e, state);
                    frontier.finish(&target, state);
                }
            }
        };

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl finished ({}): {} pages collected in {:?}",
            stop_reason.as_str(),
            pages.len(),
            elapsed
        );

        Ok(CrawlReport {
            seed: seed_url,
            pages,
            frontier_remaining: frontier.len(),
            outcomes: frontier.into_outcomes(),
            links_discovered,
            pagination_links,
            started_at,
            elapsed,
            stop_reason,
        })
    }

    /// Enqueues the admissible links of a fetched page
    fn admit_links(
        &self,
        frontier: &mut Frontier,
        source: &CrawlTarget,
        page: &FetchedPage,
        links: &[DiscoveredLink],
    ) {
        let mut added = 0;

        for link in links {
            let target = match CrawlTarget::new(link.url.clone()) {
                Ok(t) => t,
                Err(e) => {
                    tracing::debug!("Skipping link {}: {}", link.url, e);
                    continue;
                }
            };

            if self.settings.same_origin_only && target.origin != source.origin {
                tracing::trace!("Skipping off-origin link {}", target.url);
                continue;
            }

            if link.is_pagination {
                tracing::debug!("Pagination link on {}: {}", page.final_url, target.url);
            }

            if frontier.push(target) {
                added += 1;
            }
        }

        tracing::debug!(
            "{}: {} links, {} newly queued",
            page.final_url,
            links.len(),
            added
        );
    }

    /// Gets the robots.txt gate for an origin, fetching it on first use
    async fn gate_for<'a>(
        &self,
        gates: &'a mut HashMap<String, PolicyGate>,
        origin: &str,
    ) -> &'a PolicyGate {
        if !gates.contains_key(origin) {
            let gate =
                PolicyGate::fetch(&self.client, origin, self.settings.request_timeout()).await;
            tracing::debug!("robots.txt for {}: {:?}", gate.origin(), gate.source());
            gates.insert(origin.to_string(), gate);
        }
        &gates[origin]
    }
}

/// Normalized final URL of a redirected fetch
///
/// `None` when the fetch ended on the URL it asked for, up to normalization.
fn redirect_key(target: &CrawlTarget, page: &FetchedPage) -> Option<String> {
    let redirected = CrawlTarget::new(page.final_url.clone()).ok()?;
    (redirected.key() != target.key()).then(|| redirected.key().to_string())
}

/// Validates the seed URL
fn parse_seed(seed: &str) -> Result<CrawlTarget, ScoutError> {
    let invalid = |reason: String| ScoutError::InvalidSeed {
        url: seed.to_string(),
        reason,
    };

    let url = Url::parse(seed.trim()).map_err(|e| invalid(e.to_string()))?;
    CrawlTarget::new(url).map_err(|e| invalid(e.to_string()))
}
