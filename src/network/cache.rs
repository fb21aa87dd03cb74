//! Page content cache
//!
//! Maps a normalized URL to previously fetched page content. Entries carry a
//! fetch timestamp and are served only while younger than the configured
//! time-to-live; an expired entry behaves as a miss and is superseded in
//! place by the next fetch. Entries are never explicitly deleted.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::time::Instant;

use crate::security::TrustedHtml;

/// One fetched page's reusable content
#[derive(Debug, Clone)]
pub struct PageEntry {
    /// Normalized URL the entry was fetched from
    pub url: String,
    /// Document title
    pub title: String,
    /// Body inner markup, already through the markup policy
    pub body: TrustedHtml,
    /// Ordered stylesheet hrefs the page requires
    pub stylesheets: Vec<String>,
    /// Ordered page-owned script srcs (router bundle excluded)
    pub scripts: Vec<String>,
    /// When the entry was fetched
    pub fetched_at: Instant,
}

impl PageEntry {
    /// Whether this entry is still servable under `ttl`
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Time-bounded store of fetched pages.
///
/// Cheap to clone; clones share the same underlying map. Callers receive
/// read-only [`Arc<PageEntry>`] views.
#[derive(Clone)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<String, Arc<PageEntry>>>>,
    ttl: Duration,
}

impl PageCache {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Get the entry for `url` if present and fresh; expired entries miss
    pub fn get(&self, url: &str) -> Option<Arc<PageEntry>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(url)?;
        if entry.is_fresh(self.ttl) {
            Some(Arc::clone(entry))
        } else {
            None
        }
    }

    /// Store an entry for `url`, overwriting unconditionally.
    /// Returns the stored read-only view.
    pub fn put(&self, url: &str, entry: PageEntry) -> Arc<PageEntry> {
        let entry = Arc::new(entry);
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(url.to_owned(), Arc::clone(&entry));
        }
        entry
    }

    /// Whether any entry exists for `url`, expired or not.
    ///
    /// Deliberately ignores the TTL: this check suppresses duplicate
    /// in-flight work during rapid hover bursts, while render-path reads go
    /// through [`PageCache::get`], which re-checks freshness.
    pub fn has(&self, url: &str) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(url))
            .unwrap_or(false)
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
