//! URL handling module for webtable
//!
//! This module splits URLs into the parts the row key scheme needs and
//! provides the domain label reversal shared by encoding and decoding.

mod domain;
mod normalize;

use std::fmt;

// Re-export main functions
pub use domain::{reverse_domain, reverse_labels};
pub use normalize::normalize;

/// A URL split into scheme, domain labels and path
///
/// The domain always has at least one non-empty, lowercase label and the path
/// always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    scheme: String,
    labels: Vec<String>,
    path: String,
}

impl NormalizedUrl {
    pub(crate) fn from_parts(scheme: &str, labels: Vec<String>, path: &str) -> Self {
        debug_assert!(!labels.is_empty());
        debug_assert!(path.starts_with('/'));
        Self {
            scheme: scheme.to_string(),
            labels,
            path: path.to_string(),
        }
    }

    /// The scheme as written, without the `://` separator
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Domain labels in host order (`www`, `example`, `com`)
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The dotted domain in host order
    pub fn domain(&self) -> String {
        self.labels.join(".")
    }

    /// The dotted domain in reverse label order (`com.example.www`)
    pub fn reversed_domain(&self) -> String {
        reverse_labels(&self.labels).join(".")
    }

    /// The path, starting with `/`, exactly as it appeared in the input
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.domain(), self.path)
    }
}
