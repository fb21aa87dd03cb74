//! Page retrieval
//!
//! Cache-or-network fetch of a page document: issues the marker-header GET,
//! gates the response body through the markup policy, extracts the swap
//! payload, and writes the entry into the page cache before returning it.

use std::sync::Arc;

use tokio::time::Instant;

use crate::dom::extract;
use crate::network::cache::{PageCache, PageEntry};
use crate::network::transport::{PageRequest, PageTransport};
use crate::security::MarkupPolicy;
use crate::utils::{FetchError, Result};

/// Header identifying navigation-layer requests to the origin server,
/// letting it return a partial or otherwise optimized response
pub const SPA_MARKER_HEADER: &str = "X-Rodin-SPA";

/// Retrieves pages and populates the page cache
pub struct PageFetcher {
    transport: Arc<dyn PageTransport>,
    policy: Arc<dyn MarkupPolicy>,
    cache: PageCache,
    bundle_markers: Vec<String>,
    fallback_title: String,
}

impl PageFetcher {
    /// Create a fetcher writing into `cache`
    pub fn new(
        transport: Arc<dyn PageTransport>,
        policy: Arc<dyn MarkupPolicy>,
        cache: PageCache,
        bundle_markers: Vec<String>,
        fallback_title: String,
    ) -> Self {
        Self {
            transport,
            policy,
            cache,
            bundle_markers,
            fallback_title,
        }
    }

    /// Get the entry for `url`: from the cache while fresh, otherwise fetched,
    /// parsed, and cached before returning
    pub async fn fetch_page(&self, url: &str) -> Result<Arc<PageEntry>> {
        if let Some(entry) = self.cache.get(url) {
            log::debug!("cache hit for {url}");
            return Ok(entry);
        }

        log::debug!("fetching {url}");
        let request = PageRequest::get(url).header(SPA_MARKER_HEADER, "1");
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url: url.to_owned(),
            }
            .into());
        }

        // Raw network content never reaches the document: the policy runs
        // before any fragment is built.
        let trusted = self.policy.sanitize(response.body())?;
        let page = extract::extract_page(&trusted, &self.bundle_markers)?;

        let entry = PageEntry {
            url: url.to_owned(),
            title: page.title.unwrap_or_else(|| self.fallback_title.clone()),
            body: page.body,
            stylesheets: page.stylesheets,
            scripts: page.scripts,
            fetched_at: Instant::now(),
        };
        Ok(self.cache.put(url, entry))
    }
}
