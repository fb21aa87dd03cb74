//! Markup trust boundary
//!
//! Raw network content never reaches the live document directly; it is
//! funneled through a [`MarkupPolicy`] that mints [`TrustedHtml`].

pub mod policy;

pub use policy::{DenyListPolicy, MarkupPolicy, PassthroughPolicy, TrustedHtml};
