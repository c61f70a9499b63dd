//! Row key construction for the web table
//!
//! A row key has the shape `<salt>!<reversed-domain><path>`:
//!
//! - `salt`: four lowercase hex characters taken from a digest of the raw URL.
//!   It scatters otherwise sequential URLs across the store's shards.
//! - `!`: separator. It sorts before every alphanumeric byte, so the domain
//!   segment stays contiguous after the salt.
//! - `reversed-domain`: the host labels in reverse order (`com.example.www`),
//!   which groups a site and its subdomains under one readable prefix.
//! - `path`: the URL path, verbatim.
//!
//! Encoding is a pure function of the input string, so independent writers
//! always converge on the same row for the same URL.

mod decode;
mod encode;
mod salt;

pub use decode::{decode, DecodedKey};
pub use encode::{encode, KeyEncoder};
pub use salt::{all_salts, is_salt, SaltDigest, SALT_BYTES, SALT_HEX_LEN};

use crate::KeyError;
use std::fmt;

/// Separator between the salt and the rest of the key
pub const KEY_SEPARATOR: char = '!';

/// A fully formed row key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey(String);

impl RowKey {
    /// Assembles a key from its parts
    pub(crate) fn from_parts(salt: &str, reversed_domain: &str, path: &str) -> Self {
        Self(format!("{salt}{KEY_SEPARATOR}{reversed_domain}{path}"))
    }

    /// Wraps raw key bytes read back from the store
    ///
    /// Fails if the bytes are not UTF-8 or carry no salt separator.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let key = std::str::from_utf8(bytes)
            .map_err(|_| KeyError::MalformedKey(String::from_utf8_lossy(bytes).into_owned()))?;
        Self::parse(key)
    }

    /// Wraps an existing key string after checking for the salt separator
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        if !key.contains(KEY_SEPARATOR) {
            return Err(KeyError::MalformedKey(key.to_string()));
        }
        Ok(Self(key.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The salt segment in front of the separator
    pub fn salt(&self) -> &str {
        self.0
            .split_once(KEY_SEPARATOR)
            .map(|(salt, _)| salt)
            .unwrap_or_default()
    }

    /// Splits the key into its segments
    pub fn decode(&self) -> Result<DecodedKey, KeyError> {
        decode(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for RowKey {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Scan prefix selecting one domain inside one salt bucket
///
/// With `include_subdomains` the prefix ends in `.` so only deeper labels
/// match (`com.example.` matches `com.example.www` but not `com.examples`).
pub fn domain_prefix(salt: &str, reversed_domain: &str, include_subdomains: bool) -> String {
    if include_subdomains {
        format!("{salt}{KEY_SEPARATOR}{reversed_domain}.")
    } else {
        format!("{salt}{KEY_SEPARATOR}{reversed_domain}/")
    }
}
