//! # Rodin - Client-side Navigation Engine
//!
//! Turns a server-rendered, multi-page site into a single-page-application
//! experience: same-origin link clicks are intercepted, the target page's
//! HTML is fetched out-of-band, the live DOM is patched in place, and
//! session history stays consistent, all without a full page reload.
//!
//! ## Architecture
//!
//! The engine is organized into the following modules:
//!
//! - **router**: navigation controller, link classifier, session history,
//!   prefetch scheduler, and configuration
//! - **network**: page transport, fetcher, and the time-bounded page cache
//! - **dom**: the live document, markup extraction, resource reconciliation
//! - **security**: the trusted-markup boundary
//! - **triggers**: the event surface (clicks, hover, focus, viewport,
//!   popstate)
//! - **platform**: capability-selected strategies
//! - **utils**: shared error types

pub mod dom;
pub mod network;
pub mod platform;
pub mod router;
pub mod security;
pub mod triggers;
pub mod utils;

// Re-export main types for convenience
pub use router::{Collaborators, NavigationOutcome, NavigationService, RouterConfig};
pub use triggers::TriggerSurface;
pub use utils::error::{Result, RouterError};

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Rodin";
