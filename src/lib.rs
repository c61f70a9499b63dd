//! Webtable: salted row keys and a link-graph schema for crawled pages
//!
//! This crate stores crawled web pages in a wide-column store. Row keys are
//! salted with a short digest prefix so bulk ingestion spreads across shards,
//! while the reversed domain keeps every page of a site under a common prefix.
//! Hyperlinks are stored twice, as an outlink on the source row and an inlink
//! on the target row, and the two halves are written independently.

pub mod config;
pub mod families;
pub mod links;
pub mod page;
pub mod rowkey;
pub mod seed;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for webtable operations
#[derive(Debug, Error)]
pub enum WebTableError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Row key error: {0}")]
    Key(#[from] KeyError),

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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
}

/// URL-specific errors
///
/// Both variants mean the input is not a URL this crate can key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Missing scheme separator '://' in URL: {0}")]
    MissingScheme(String),

    #[error("Empty domain label in URL: {0}")]
    EmptyDomainLabel(String),
}

/// Row key encoding and decoding errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("Malformed URL: {0}")]
    Url(#[from] UrlError),

    #[error("Digest algorithm unavailable: {0}")]
    DigestUnavailable(String),

    #[error("Malformed row key (no salt separator): {0}")]
    MalformedKey(String),
}

/// Result type alias for webtable operations
pub type Result<T> = std::result::Result<T, WebTableError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for row key operations
pub type KeyResult<T> = std::result::Result<T, KeyError>;

// Re-export commonly used types
pub use config::Config;
pub use links::{EdgeState, LinkGraphWriter, LinkWriteResult};
pub use page::{PageFieldSet, PageRecord, PageTable};
pub use rowkey::{decode, encode, DecodedKey, KeyEncoder, RowKey, SaltDigest};
pub use store::{MemoryStore, SqliteStore, StoreError, WideColumnStore};
pub use url::{normalize, NormalizedUrl};
