//! Viewport prefetch registry
//!
//! Links opting in with `data-prefetch="true"` are registered by a scheduled
//! scan and fire at most once when they become visible; firing unregisters
//! the link.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::dom::LiveDocument;

/// Observe-once registry of viewport-prefetch candidates
#[derive(Debug, Default)]
pub struct ViewportTracker {
    observed: Mutex<HashSet<String>>,
}

impl ViewportTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the document's opted-in links, replacing any previous pass.
    /// Returns the number of links now observed.
    pub fn scan(&self, document: &LiveDocument) -> usize {
        let links: HashSet<String> = document
            .anchors()
            .iter()
            .filter(|anchor| anchor.prefetch_hint)
            .map(|anchor| anchor.href.clone())
            .collect();
        let count = links.len();
        if let Ok(mut observed) = self.observed.lock() {
            *observed = links;
        }
        count
    }

    /// Whether a visibility report for `href` should fire a prefetch.
    /// Fires at most once: the link is unobserved on the first report.
    pub fn should_fire(&self, href: &str) -> bool {
        self.observed
            .lock()
            .map(|mut observed| observed.remove(href))
            .unwrap_or(false)
    }

    /// Number of links currently observed
    pub fn observed(&self) -> usize {
        self.observed.lock().map(|set| set.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::TrustedHtml;

    fn document() -> LiveDocument {
        LiveDocument::new(
            "Home",
            TrustedHtml::from_sanitized(
                r#"<a href="/a" data-prefetch="true">a</a>
                   <a href="/b" data-prefetch="true">b</a>
                   <a href="/c">c</a>"#
                    .to_owned(),
            ),
        )
    }

    #[test]
    fn test_scan_registers_only_opted_in_links() {
        let tracker = ViewportTracker::new();
        assert_eq!(tracker.scan(&document()), 2);
        assert_eq!(tracker.observed(), 2);
        assert!(!tracker.should_fire("/c"));
    }

    #[test]
    fn test_fires_at_most_once() {
        let tracker = ViewportTracker::new();
        tracker.scan(&document());

        assert!(tracker.should_fire("/a"));
        assert!(!tracker.should_fire("/a"));
        assert_eq!(tracker.observed(), 1);
    }

    #[test]
    fn test_unscanned_links_never_fire() {
        let tracker = ViewportTracker::new();
        assert!(!tracker.should_fire("/a"));
    }
}
