use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable holding the owner resolution credential
pub const API_KEY_ENV: &str = "CONTACT_SCOUT_API_KEY";

/// Environment variable overriding the owner resolution endpoint
pub const API_ENDPOINT_ENV: &str = "CONTACT_SCOUT_API_ENDPOINT";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides ([`API_KEY_ENV`], [`API_ENDPOINT_ENV`]) are applied
/// after parsing and before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use contact_scout::config::load_config;
///
/// let config = load_config(Path::new("contact-scout.toml")).unwrap();
/// println!("Crawl budget: {}s", config.crawler.crawl_budget_secs);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    finish(config, |name| std::env::var(name).ok())
}

/// Builds a configuration from defaults and the environment only
///
/// Used when no configuration file is given.
pub fn load_default_config() -> Result<Config, ConfigError> {
    finish(Config::default(), |name| std::env::var(name).ok())
}

/// Parses TOML configuration content without applying overrides
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Applies environment overrides using the given variable lookup
///
/// Non-empty values replace whatever the file specified.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
        config.resolver.api_key = Some(key);
    }

    if let Some(endpoint) = lookup(API_ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
        config.resolver.endpoint = endpoint;
    }
}

fn finish<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup);
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so a run can be tied to the exact file it used.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok((Config, String))` - Successfully loaded configuration and its hash
/// * `Err(ConfigError)` - Failed to load or parse the configuration
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
crawl-budget-secs = 600
request-timeout-secs = 5
max-pages = 50
same-origin-only = true

[user-agent]
crawler-name = "TestScout"
crawler-version = "1.0"
contact-url = "https://example.com/bot"

[resolver]
endpoint = "https://owners.example.com/v1/identify"
api-key = "secret"
batch-size = 5
timeout-secs = 3
"#;

        let file = create_temp_config(config_content);
        let config = parse_config(&std::fs::read_to_string(file.path()).unwrap()).unwrap();

        assert_eq!(config.crawler.crawl_budget_secs, 600);
        assert_eq!(config.crawler.request_timeout_secs, 5);
        assert_eq!(config.crawler.max_pages, Some(50));
        assert!(config.crawler.same_origin_only);
        assert_eq!(config.user_agent.crawler_name, "TestScout");
        assert_eq!(config.resolver.batch_size, 5);
        assert_eq!(config.resolver.credential(), Some("secret"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[resolver]\napi-key = \"k\"\n").unwrap();

        assert_eq!(config.crawler.crawl_budget_secs, 1800);
        assert_eq!(config.crawler.request_timeout_secs, 10);
        assert_eq!(config.crawler.max_pages, None);
        assert!(!config.crawler.same_origin_only);
        assert_eq!(config.resolver.batch_size, 10);
        assert_eq!(config.resolver.timeout_secs, 10);
        assert_eq!(config.user_agent.crawler_name, "ContactScout");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/contact-scout.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[resolver]\nbatch-size = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut config = parse_config("[resolver]\napi-key = \"from-file\"\n").unwrap();
        apply_env_overrides(&mut config, |name| match name {
            API_KEY_ENV => Some("from-env".to_string()),
            API_ENDPOINT_ENV => Some("http://127.0.0.1:9000/identify".to_string()),
            _ => None,
        });

        assert_eq!(config.resolver.credential(), Some("from-env"));
        assert_eq!(config.resolver.endpoint, "http://127.0.0.1:9000/identify");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = parse_config("[resolver]\napi-key = \"from-file\"\n").unwrap();
        apply_env_overrides(&mut config, |_| Some("   ".to_string()));

        assert_eq!(config.resolver.credential(), Some("from-file"));
    }

    #[test]
    fn test_blank_api_key_is_no_credential() {
        let config = parse_config("[resolver]\napi-key = \"  \"\n").unwrap();
        assert_eq!(config.resolver.credential(), None);
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = parse_config("[resolver]\napi-key = \"super-secret\"\n").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
