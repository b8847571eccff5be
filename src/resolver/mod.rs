//! Owner resolution client
//!
//! Sends email contexts in batches to an external inference service that
//! names the person or organisation each address belongs to. The output
//! always has one result per input, in input order, whatever the service
//! does.
//!
//! # Failure handling
//!
//! | Condition | Effect |
//! |-----------|--------|
//! | Non-2xx status for a batch | That batch is unknown, later batches continue |
//! | Transport error or timeout | Every context is unknown |
//! | Undecodable response body | Every context is unknown |
//! | Result count differs from batch size | Every context is unknown |

mod types;

pub use types::{OwnerResult, ResolveRequest, ResolveResponse, ResolvedEntry};

use crate::config::{ResolverConfig, API_KEY_ENV};
use crate::ConfigError;
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a batch request did not produce usable results
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("service returned HTTP {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected {expected} results, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

impl ResolveError {
    /// True when the failure invalidates the whole input, not just one batch
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Status { .. })
    }
}

/// Client for the owner resolution service
#[derive(Clone)]
pub struct OwnerResolver {
    client: Client,
    endpoint: Url,
    api_key: String,
    batch_size: usize,
    timeout: Duration,
}

impl OwnerResolver {
    /// Creates a resolver
    ///
    /// Fails with [`ConfigError::MissingCredential`] when no API key is
    /// configured, before any request is made.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolver settings (endpoint, key, batch size, timeout)
    /// * `client` - Shared HTTP client
    pub fn new(config: &ResolverConfig, client: &Client) -> Result<Self, ConfigError> {
        let api_key = config
            .credential()
            .ok_or(ConfigError::MissingCredential { env: API_KEY_ENV })?
            .to_string();

        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("resolver.endpoint '{}': {}", config.endpoint, e))
        })?;

        Ok(Self {
            client: client.clone(),
            endpoint,
            api_key,
            batch_size: config.batch_size.max(1),
            timeout: config.timeout(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resolves the owner of every context
    ///
    /// Returns exactly `contexts.len()` results in the same order. Empty
    /// input makes no request.
    pub async fn resolve(&self, contexts: &[String]) -> Vec<OwnerResult> {
        if contexts.is_empty() {
            return Vec::new();
        }

        let batch_count = contexts.len().div_ceil(self.batch_size);
        tracing::info!(
            "Resolving owners for {} contexts in {} batches",
            contexts.len(),
            batch_count
        );

        let mut results = Vec::with_capacity(contexts.len());

        for (index, batch) in contexts.chunks(self.batch_size).enumerate() {
            match self.resolve_batch(batch).await {
                Ok(owners) => {
                    results.extend(
                        batch
                            .iter()
                            .zip(owners)
                            .map(|(context, owner)| OwnerResult::new(context.as_str(), owner)),
                    );
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!(
                        "Owner resolution failed on batch {}/{}: {}; marking all {} contexts unknown",
                        index + 1,
                        batch_count,
                        e,
                        contexts.len()
                    );
                    return contexts.iter().map(|c| OwnerResult::unknown(c.as_str())).collect();
                }
                Err(e) => {
                    tracing::warn!(
                        "Owner resolution batch {}/{} rejected: {}; marking {} contexts unknown",
                        index + 1,
                        batch_count,
                        e,
                        batch.len()
                    );
                    results.extend(batch.iter().map(|c| OwnerResult::unknown(c.as_str())));
                }
            }
        }

        let known = results.iter().filter(|r| r.is_known()).count();
        tracing::info!("Resolved {} of {} owners", known, results.len());

        results
    }

    /// Submits one batch, returning one owner per context in batch order
    async fn resolve_batch(&self, batch: &[String]) -> Result<Vec<Option<String>>, ResolveError> {
        tracing::debug!("POST {} with {} contexts", self.endpoint, batch.len());

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .json(&ResolveRequest {
                email_contexts: batch,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Resolver error body: {}", body);
            return Err(ResolveError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ResolveResponse = serde_json::from_str(&body)?;

        if parsed.results.len() != batch.len() {
            return Err(ResolveError::CountMismatch {
                expected: batch.len(),
                actual: parsed.results.len(),
            });
        }

        Ok(parsed.results.iter().map(ResolvedEntry::owner_name).collect())
    }
}

impl std::fmt::Debug for OwnerResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnerResolver")
            .field("endpoint", &self.endpoint.as_str())
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
