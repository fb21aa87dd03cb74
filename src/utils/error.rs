//! Error types for the rodin navigation engine

use thiserror::Error;

/// Main error type for router operations
#[derive(Debug, Error)]
pub enum RouterError {
    /// Page retrieval failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// Fetched markup could not be turned into swappable content
    #[error("markup error: {0}")]
    Markup(#[from] MarkupError),
}

/// Errors raised while retrieving a page over the network
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success HTTP status for a page request
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
    /// Transport-level failure (DNS, TLS, connection, body read)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The URL could not be parsed or resolved
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors raised while parsing or sanitizing fetched markup
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The markup policy refused the document
    #[error("markup rejected by policy: {0}")]
    PolicyRejected(String),
    /// The document could not be parsed
    #[error("markup parse failed: {0}")]
    Parse(String),
    /// The document has no body element
    #[error("document has no body")]
    MissingBody,
}

/// A stylesheet or script failed to load during reconciliation.
///
/// Never fatal: the reconciler settles once every resource has loaded or
/// errored, so a missing asset degrades the page without blocking navigation.
#[derive(Debug, Error)]
#[error("resource {url} failed to load: {reason}")]
pub struct ResourceError {
    /// URL of the resource that failed
    pub url: String,
    /// Human-readable failure reason
    pub reason: String,
}

/// Convenience Result type for router operations
pub type Result<T> = std::result::Result<T, RouterError>;
