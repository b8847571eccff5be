use crate::config::types::{Config, CrawlerConfig, ResolverConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Largest batch the owner service is asked to handle in one request
const MAX_BATCH_SIZE: usize = 100;

/// Validates the entire configuration
///
/// The resolver credential is not checked here; a missing credential is
/// reported when the resolver is constructed.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_resolver_config(&config.resolver)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.crawl_budget_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "crawl_budget_secs must be >= 1, got {}",
            config.crawl_budget_secs
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt product token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates owner resolution service configuration
fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid resolver endpoint '{}': {}", config.endpoint, e))
    })?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Resolver endpoint '{}' must use http or https",
            config.endpoint
        )));
    }

    if config.batch_size < 1 || config.batch_size > MAX_BATCH_SIZE {
        return Err(ConfigError::Validation(format!(
            "batch_size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, config.batch_size
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "resolver timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}
