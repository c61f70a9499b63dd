use crate::rowkey::{RowKey, SaltDigest};
use crate::url::normalize;
use crate::KeyError;

/// Builds row keys with a fixed salt digest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyEncoder {
    digest: SaltDigest,
}

impl KeyEncoder {
    pub fn new(digest: SaltDigest) -> Self {
        Self { digest }
    }

    /// Creates an encoder for the digest with the given configuration name
    ///
    /// # Returns
    ///
    /// * `Ok(KeyEncoder)` - The digest is available
    /// * `Err(KeyError::DigestUnavailable)` - Unknown digest name
    pub fn from_digest_name(name: &str) -> Result<Self, KeyError> {
        Ok(Self::new(SaltDigest::from_name(name)?))
    }

    pub fn digest(&self) -> SaltDigest {
        self.digest
    }

    /// Computes the row key for a URL
    ///
    /// The salt is taken from the URL string exactly as given, while the
    /// domain and path come from the normalized form. Two spellings of one
    /// page therefore share a domain segment but not necessarily a salt.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to key
    ///
    /// # Returns
    ///
    /// * `Ok(RowKey)` - `<salt>!<reversed-domain><path>`
    /// * `Err(KeyError::Url)` - The URL could not be normalized
    pub fn encode(&self, url: &str) -> Result<RowKey, KeyError> {
        let salt = self.digest.salt(url);
        let normalized = normalize(url)?;
        let key = RowKey::from_parts(&salt, &normalized.reversed_domain(), normalized.path());

        tracing::trace!("Encoded {} -> {}", url, key);
        Ok(key)
    }
}

/// Computes the row key for a URL with the default digest
///
/// # Examples
///
/// ```
/// use webtable::rowkey::encode;
///
/// let key = encode("https://www.example.com/about").unwrap();
/// assert!(key.as_str().ends_with("!com.example.www/about"));
/// assert_eq!(key.salt().len(), 4);
/// ```
pub fn encode(url: &str) -> Result<RowKey, KeyError> {
    KeyEncoder::default().encode(url)
}
