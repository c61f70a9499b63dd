use crate::rowkey::KEY_SEPARATOR;
use crate::url::reverse_domain;
use crate::KeyError;

/// The segments of a row key
///
/// This is a best-effort inverse for diagnostics and scans. The scheme and
/// the exact digest input are not recoverable from a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    pub salt: String,
    pub reversed_domain: String,
    pub path: String,
}

impl DecodedKey {
    /// The domain in host order (`www.example.com`)
    pub fn domain(&self) -> String {
        reverse_domain(&self.reversed_domain)
    }
}

/// Splits a row key into salt, reversed domain and path
///
/// The key is split at the first `!`; the rest is split at the first `/`.
/// A key without a path segment decodes with path `/`.
///
/// # Returns
///
/// * `Ok(DecodedKey)` - The key segments
/// * `Err(KeyError::MalformedKey)` - The key has no salt separator
///
/// # Examples
///
/// ```
/// use webtable::rowkey::decode;
///
/// let decoded = decode("a0!com.example.www/about").unwrap();
/// assert_eq!(decoded.salt, "a0");
/// assert_eq!(decoded.reversed_domain, "com.example.www");
/// assert_eq!(decoded.domain(), "www.example.com");
/// assert_eq!(decoded.path, "/about");
/// ```
pub fn decode(key: &str) -> Result<DecodedKey, KeyError> {
    let (salt, remainder) = key
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| KeyError::MalformedKey(key.to_string()))?;

    let (reversed_domain, path) = match remainder.find('/') {
        Some(idx) => (&remainder[..idx], &remainder[idx..]),
        None => (remainder, "/"),
    };

    Ok(DecodedKey {
        salt: salt.to_string(),
        reversed_domain: reversed_domain.to_string(),
        path: path.to_string(),
    })
}
