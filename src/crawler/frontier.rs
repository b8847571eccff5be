//! Frontier queue and visited set for one crawl
//!
//! This module handles:
//! - FIFO (breadth-first) ordering of URLs awaiting fetch
//! - Deduplication against both queued and already visited URLs
//! - Per-state counts of finished URLs
//!
//! The frontier is owned by a single coordinator for the lifetime of one
//! crawl, so no locking is involved.

use crate::state::PageState;
use crate::url::{extract_origin, normalize_parsed};
use crate::UrlError;
use std::collections::{BTreeMap, HashSet, VecDeque};
use url::Url;

/// An absolute URL waiting to be fetched
///
/// The URL is requested exactly as discovered (minus the fragment); only the
/// deduplication key is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// URL to request
    pub url: Url,

    /// Origin of the URL (scheme, host and non-default port)
    pub origin: String,

    /// Normalized form of `url`
    key: String,
}

impl CrawlTarget {
    /// Builds a target from an absolute http(s) URL
    pub fn new(mut url: Url) -> Result<Self, UrlError> {
        url.set_fragment(None);
        let normalized = normalize_parsed(url.clone())?;
        let origin = extract_origin(&normalized).ok_or(UrlError::MissingDomain)?;
        Ok(Self {
            url,
            origin,
            key: normalized.into(),
        })
    }

    /// Deduplication key
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Breadth-first frontier with a visited set
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs awaiting fetch, in discovery order
    queue: VecDeque<CrawlTarget>,

    /// Keys currently in `queue`
    queued: HashSet<String>,

    /// Keys already fetched or rejected
    visited: HashSet<String>,

    /// Terminal state counts
    outcomes: BTreeMap<PageState, usize>,
}

impl Frontier {
    /// Creates a frontier containing only the seed
    pub fn new(seed: CrawlTarget) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Enqueues a target unless it is already queued or visited
    ///
    /// Returns true if the target was added.
    pub fn push(&mut self, target: CrawlTarget) -> bool {
        let key = target.key();
        if self.visited.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.queue.push_back(target);
        true
    }

    /// Takes the oldest queued target
    pub fn pop(&mut self) -> Option<CrawlTarget> {
        let target = self.queue.pop_front()?;
        self.queued.remove(target.key());
        Some(target)
    }

    /// Returns true if the key was already fetched or rejected
    pub fn is_visited(&self, key: &str) -> bool {
        self.visited.contains(key)
    }

    /// Records the terminal state of a target and marks it visited
    pub fn finish(&mut self, target: &CrawlTarget, state: PageState) {
        self.visited.insert(target.key().to_string());
        *self.outcomes.entry(state).or_insert(0) += 1;
    }

    /// Marks an additional key as visited without counting an outcome
    ///
    /// Used for the final URL of a redirected fetch, so the redirect target
    /// is skipped if it is still queued or discovered later.
    pub fn mark_alias(&mut self, key: &str) {
        self.visited.insert(key.to_string());
    }

    /// Number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Consumes the frontier, returning the terminal state counts
    pub fn into_outcomes(self) -> BTreeMap<PageState, usize> {
        self.outcomes
    }
}
