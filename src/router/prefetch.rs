//! Speculative prefetching
//!
//! Fire-and-forget cache warming for links the user is likely to follow.
//! Failures are swallowed: prefetching must never surface a user-visible
//! error. There is no timeout; a stuck request leaves its in-flight mark
//! until it settles, which only suppresses further prefetches of that URL.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::network::{PageCache, PageFetcher};

/// Warms the page cache without ever blocking or racing a navigation
pub struct PrefetchScheduler {
    cache: PageCache,
    fetcher: Arc<PageFetcher>,
    in_flight: Mutex<HashSet<String>>,
}

impl PrefetchScheduler {
    /// Create a scheduler warming `cache` through `fetcher`
    pub fn new(cache: PageCache, fetcher: Arc<PageFetcher>) -> Self {
        Self {
            cache,
            fetcher,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Warm the cache for `url`.
    ///
    /// No-op when any cache entry exists (even an expired one; the fresh
    /// read happens at render time) or when a prefetch for `url` is already
    /// in flight.
    pub async fn prefetch(&self, url: &str) {
        if self.cache.has(url) {
            return;
        }
        {
            let Ok(mut in_flight) = self.in_flight.lock() else {
                return;
            };
            if !in_flight.insert(url.to_owned()) {
                return;
            }
        }

        if let Err(error) = self.fetcher.fetch_page(url).await {
            log::debug!("prefetch of {url} failed: {error}");
        }

        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(url);
        }
    }

    /// Number of prefetches currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().map(|set| set.len()).unwrap_or(0)
    }
}
