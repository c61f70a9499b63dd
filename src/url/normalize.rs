use crate::url::NormalizedUrl;
use crate::UrlError;

/// Separator between the scheme and the rest of the URL
const SCHEME_SEPARATOR: &str = "://";

/// Splits a URL into scheme, domain labels and path
///
/// # Normalization Steps
///
/// 1. Split at the first `://` into scheme and remainder; reject if absent
/// 2. Split the remainder at the first `/` into domain and raw path
///    - Missing path becomes `/`
/// 3. Split the domain into dot-separated labels; reject empty labels
/// 4. Lowercase the domain labels
///
/// The path is kept byte-for-byte. No percent-decoding, IDNA handling or
/// trailing-slash canonicalization happens here; callers that need
/// deduplication of equivalent URLs must canonicalize before calling.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(NormalizedUrl)` - The parsed URL parts
/// * `Err(UrlError)` - The URL has no scheme separator or an empty domain label
///
/// # Examples
///
/// ```
/// use webtable::url::normalize;
///
/// let url = normalize("https://WWW.Example.com/About/").unwrap();
/// assert_eq!(url.domain(), "www.example.com");
/// assert_eq!(url.path(), "/About/");
/// ```
pub fn normalize(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    // Step 1: Scheme
    let (scheme, remainder) = url_str
        .split_once(SCHEME_SEPARATOR)
        .ok_or_else(|| UrlError::MissingScheme(url_str.to_string()))?;

    // Step 2: Domain and path
    let (domain, path) = match remainder.find('/') {
        Some(idx) => (&remainder[..idx], &remainder[idx..]),
        None => (remainder, "/"),
    };

    // Step 3 & 4: Labels
    let labels = split_labels(domain)
        .ok_or_else(|| UrlError::EmptyDomainLabel(url_str.to_string()))?;

    Ok(NormalizedUrl::from_parts(scheme, labels, path))
}

/// Splits a domain into lowercase labels, or `None` if any label is empty
fn split_labels(domain: &str) -> Option<Vec<String>> {
    let labels: Vec<String> = domain.split('.').map(str::to_lowercase).collect();

    // "".split('.') yields one empty label, so this also rejects an empty domain
    if labels.iter().any(String::is_empty) {
        return None;
    }

    Some(labels)
}
