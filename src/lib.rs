//! Contact-Scout: contact email discovery for websites
//!
//! This crate crawls a site from a seed URL while respecting robots.txt,
//! extracts email addresses (including simple `[at]` obfuscations) together
//! with their surrounding text, and asks an external inference service who
//! owns each address.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Owner resolution API key is not configured (set resolver.api-key or {env})")]
    MissingCredential { env: &'static str },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Contact-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, CrawledPage, Crawler};
pub use extract::{extract_emails, EmailContext};
pub use pipeline::{EmailOwner, Pipeline};
pub use resolver::{OwnerResolver, OwnerResult};
pub use state::PageState;
pub use crate::url::{extract_origin, normalize_url};
