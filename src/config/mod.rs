//! Configuration module for webtable
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webtable::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webtable.toml")).unwrap();
//! let store = config.open_store().unwrap();
//! println!("Store has {} column families", store.families().len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, KeysConfig, StoreBackend, StoreConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
