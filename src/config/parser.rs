use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads a sync configuration file
///
/// Keys are kebab-case. Missing `[sync]` keys and optional `[shopify]` keys
/// take their defaults, then the whole file is validated, including the
/// store-name and access-token checks the setup repeats.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use shopify_sync::config::load_config;
///
/// let config = load_config(Path::new("shopify-sync.toml")).unwrap();
/// println!("Page size: {}", config.shopify.page_size);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Hex SHA-256 of a configuration file, logged at startup so operators can
/// tell which settings a long-running sync was started with
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Loads a configuration together with the hash of the exact bytes parsed
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
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
[shopify]
store-name = "posthog-store"
access-token = "shpat_test"
page-size = 100

[posthog]
host = "https://app.posthog.com"
api-key = "phc_test"

[sync]
interval-secs = 30
max-pages-per-run = 20

[storage]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.shopify.store_name, "posthog-store");
        assert_eq!(config.shopify.page_size, 100);
        assert_eq!(config.shopify.api_version, "2022-01");
        assert_eq!(config.sync.interval_secs, 30);
        assert_eq!(config.sync.max_pages_per_run, 20);
        // Unset keys fall back to their defaults
        assert_eq!(config.sync.snooze_ttl_secs, 2);
        assert_eq!(config.sync.snooze_poll_ms, 250);
    }

    #[test]
    fn test_sync_section_is_optional() {
        let config_content = r#"
[shopify]
store-name = "posthog-store"
access-token = "shpat_test"

[posthog]
host = "https://app.posthog.com"
api-key = "phc_test"

[storage]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.shopify.page_size, 250);
        assert_eq!(config.sync.interval_secs, 60);
        assert!(config.shopify.base_url.is_none());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_missing_token() {
        let config_content = r#"
[shopify]
store-name = "posthog-store"

[posthog]
host = "https://app.posthog.com"
api-key = "phc_test"

[storage]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("access-token"));
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_matches_loaded_file() {
        let config_content = r#"
[shopify]
store-name = "posthog-store"
access-token = "shpat_test"

[posthog]
host = "https://app.posthog.com"
api-key = "phc_test"

[storage]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.storage.database_path, "./test.db");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
