/// Reverses the order of domain labels
///
/// Applying this twice returns the original sequence.
///
/// # Examples
///
/// ```
/// use webtable::url::reverse_labels;
///
/// let labels = vec!["www", "example", "com"];
/// assert_eq!(reverse_labels(&labels), vec!["com", "example", "www"]);
/// ```
pub fn reverse_labels<S: Clone>(labels: &[S]) -> Vec<S> {
    labels.iter().rev().cloned().collect()
}

/// Reverses a dotted domain: `www.example.com` becomes `com.example.www`
///
/// The operation is its own inverse, so it also turns a reversed domain read
/// back out of a row key into the ordinary host form.
///
/// # Examples
///
/// ```
/// use webtable::url::reverse_domain;
///
/// assert_eq!(reverse_domain("www.example.com"), "com.example.www");
/// assert_eq!(reverse_domain("com.example.www"), "www.example.com");
/// ```
pub fn reverse_domain(domain: &str) -> String {
    let labels: Vec<&str> = domain.split('.').collect();
    reverse_labels(&labels).join(".")
}
