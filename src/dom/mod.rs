//! Document side of the navigation layer
//!
//! The live document the router patches, the extraction pass that turns
//! fetched markup into a swap payload, and the reconciler that keeps the
//! document's stylesheets/scripts in line with the incoming page.

pub mod document;
pub mod extract;
pub mod resources;

pub use document::{LiveDocument, ScrollTarget};
pub use extract::{Anchor, PageExtract, extract_page};
pub use resources::{ReconcileReport, ResourceLoader, ResourceReconciler, TransportResourceLoader};

use std::sync::{Mutex, MutexGuard};

/// Lock the shared live document, recovering from poisoning
pub fn lock(document: &Mutex<LiveDocument>) -> MutexGuard<'_, LiveDocument> {
    match document.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
