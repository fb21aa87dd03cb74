//! Trusted-markup policy
//!
//! The router never assigns raw network content into the live document.
//! Fetched markup first passes through the active [`MarkupPolicy`], which
//! either rejects it or mints a [`TrustedHtml`] value, the only type
//! [`crate::dom::LiveDocument::replace_body`] accepts.

use crate::utils::MarkupError;

/// Markup that has passed the active policy.
///
/// Values can only be minted by a policy or by crate-internal serialization
/// of an already-trusted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Wrap markup that a policy has approved.
    pub(crate) fn from_sanitized(html: String) -> Self {
        Self(html)
    }

    /// View the markup as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the underlying markup string
    pub fn into_string(self) -> String {
        self.0
    }

    /// Length of the markup in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the markup is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for TrustedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decides whether fetched markup may enter the live document
pub trait MarkupPolicy: Send + Sync {
    /// Inspect `html` and either mint a trusted value or reject the document
    fn sanitize(&self, html: &str) -> Result<TrustedHtml, MarkupError>;
}

/// Policy that passes same-origin documents through unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughPolicy;

impl MarkupPolicy for PassthroughPolicy {
    fn sanitize(&self, html: &str) -> Result<TrustedHtml, MarkupError> {
        Ok(TrustedHtml::from_sanitized(html.to_owned()))
    }
}

/// Policy that rejects documents containing any configured marker
/// (matched case-insensitively)
#[derive(Debug, Clone, Default)]
pub struct DenyListPolicy {
    markers: Vec<String>,
}

impl DenyListPolicy {
    /// Create a policy rejecting documents that contain any of `markers`
    pub fn new(markers: Vec<String>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
        }
    }
}

impl MarkupPolicy for DenyListPolicy {
    fn sanitize(&self, html: &str) -> Result<TrustedHtml, MarkupError> {
        let lower = html.to_ascii_lowercase();
        for marker in &self.markers {
            if lower.contains(marker.as_str()) {
                return Err(MarkupError::PolicyRejected(marker.clone()));
            }
        }
        Ok(TrustedHtml::from_sanitized(html.to_owned()))
    }
}
