//! Configuration module for Contact-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the environment overrides for the owner resolution service.
//!
//! # Example
//!
//! ```no_run
//! use contact_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("contact-scout.toml")).unwrap();
//! println!("Batch size: {}", config.resolver.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ResolverConfig, UserAgentConfig, DEFAULT_RESOLVER_ENDPOINT,
};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
    load_default_config, parse_config, API_ENDPOINT_ENV, API_KEY_ENV,
};
pub use validation::validate;
