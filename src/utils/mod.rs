//! Shared utilities and error types

pub mod error;

pub use error::{FetchError, MarkupError, ResourceError, Result, RouterError};
