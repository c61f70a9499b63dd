use crate::rowkey::KeyEncoder;
use crate::store::{MemoryStore, SqliteStore, WideColumnStore};
use crate::{ConfigError, KeyError, WebTableError};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Main configuration structure for webtable
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub keys: KeysConfig,
}

/// Which store backend to open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Ordered map in process memory, lost on exit
    #[default]
    Memory,
    /// SQLite database file
    Sqlite,
}

/// Store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Path to the SQLite database file, required for the sqlite backend
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

/// Row key configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeysConfig {
    /// Digest used for the salt prefix ("sha256" or "sha512")
    #[serde(rename = "salt-digest", default = "default_salt_digest")]
    pub salt_digest: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            salt_digest: default_salt_digest(),
        }
    }
}

fn default_salt_digest() -> String {
    "sha256".to_string()
}

impl Config {
    /// Builds the key encoder for the configured salt digest
    pub fn key_encoder(&self) -> Result<KeyEncoder, KeyError> {
        KeyEncoder::from_digest_name(&self.keys.salt_digest)
    }

    /// Opens the configured store backend
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<dyn WideColumnStore>)` - A shared handle to the store
    /// * `Err(WebTableError)` - The database could not be opened
    pub fn open_store(&self) -> Result<Arc<dyn WideColumnStore>, WebTableError> {
        match self.store.backend {
            StoreBackend::Memory => {
                tracing::info!("Using in-memory store");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreBackend::Sqlite => {
                let path = self.store.database_path.as_deref().ok_or_else(|| {
                    ConfigError::Validation(
                        "database-path is required for the sqlite backend".to_string(),
                    )
                })?;
                Ok(Arc::new(SqliteStore::new(Path::new(path))?))
            }
        }
    }
}
