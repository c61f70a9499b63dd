//! Digest-derived salt prefixes
//!
//! The salt is the first [`SALT_BYTES`] bytes of a cryptographic digest of
//! the raw URL string, rendered as lowercase hex. Only determinism and a low
//! collision rate matter, so the algorithm is a configuration choice.

use crate::KeyError;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

/// Number of digest bytes kept for the salt
pub const SALT_BYTES: usize = 2;

/// Length of the rendered salt in hex characters
pub const SALT_HEX_LEN: usize = SALT_BYTES * 2;

/// Digest algorithm used to derive row key salts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SaltDigest {
    /// SHA-256 (default)
    #[default]
    Sha256,
    /// SHA-512
    Sha512,
}

impl SaltDigest {
    /// Looks up a digest by its configuration name
    ///
    /// Names are matched case-insensitively and may contain a dash
    /// (`sha256`, `SHA-256`).
    ///
    /// # Returns
    ///
    /// * `Ok(SaltDigest)` - The digest is available
    /// * `Err(KeyError::DigestUnavailable)` - No digest with that name is built in
    pub fn from_name(name: &str) -> Result<Self, KeyError> {
        match name.to_ascii_lowercase().replace('-', "").as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(KeyError::DigestUnavailable(name.to_string())),
        }
    }

    /// Canonical configuration name of the digest
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Computes the salt for a URL exactly as given
    ///
    /// The input is hashed as-is (not normalized), so two spellings of the
    /// same page get independent salts.
    pub fn salt(&self, url: &str) -> String {
        match self {
            Self::Sha256 => hex::encode(&Sha256::digest(url.as_bytes())[..SALT_BYTES]),
            Self::Sha512 => hex::encode(&Sha512::digest(url.as_bytes())[..SALT_BYTES]),
        }
    }
}

impl fmt::Display for SaltDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterates every possible salt value in ascending key order
///
/// Used to fan a per-domain scan out over all salt buckets.
pub fn all_salts() -> impl Iterator<Item = String> {
    (0..=u16::MAX).map(|bucket| format!("{:0width$x}", bucket, width = SALT_HEX_LEN))
}

/// Returns true if `s` looks like a rendered salt
pub fn is_salt(s: &str) -> bool {
    s.len() == SALT_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
