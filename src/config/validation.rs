use crate::config::types::{Config, KeysConfig, StoreBackend, StoreConfig};
use crate::rowkey::SaltDigest;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_store_config(&config.store)?;
    validate_keys_config(&config.keys)?;
    Ok(())
}

/// Validates store configuration
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    match (config.backend, config.database_path.as_deref()) {
        (StoreBackend::Sqlite, None) => Err(ConfigError::Validation(
            "database-path is required for the sqlite backend".to_string(),
        )),
        (StoreBackend::Sqlite, Some(path)) if path.trim().is_empty() => Err(
            ConfigError::Validation("database-path cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Validates row key configuration
fn validate_keys_config(config: &KeysConfig) -> Result<(), ConfigError> {
    SaltDigest::from_name(&config.salt_digest)
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(format!("salt-digest: {}", e)))
}
