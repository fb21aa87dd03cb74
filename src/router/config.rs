//! Router configuration

use std::time::Duration;
use url::Url;

/// How long a cached page stays servable without a refetch
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Delay before a hover fires a prefetch, so fast pointer transit stays free
pub const DEFAULT_HOVER_DEBOUNCE: Duration = Duration::from_millis(50);

/// Budget for the idle-scheduled viewport scan
pub const DEFAULT_IDLE_SCAN_BUDGET: Duration = Duration::from_secs(3);

/// Delay for the timer fallback when idle scheduling is unavailable
pub const DEFAULT_TIMER_SCAN_DELAY: Duration = Duration::from_secs(2);

/// Configuration for the navigation engine
///
/// Defaults match the production site layout: assets under `/assets/`,
/// the admin interface under `/__admin`, and the router shipped as `app.js`
/// (or a hashed `app-*` chunk).
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Origin the router considers its own; everything else is external
    pub origin: Url,
    /// Path prefix served as static assets, never routed in-place
    pub asset_prefix: String,
    /// Path prefix of the administrative interface, never routed in-place
    pub admin_prefix: String,
    /// File extensions handed to native browser handling (lowercase)
    pub excluded_extensions: Vec<String>,
    /// Time-to-live for cached page entries
    pub cache_ttl: Duration,
    /// Hover prefetch debounce
    pub hover_debounce: Duration,
    /// Viewport scan delay when idle scheduling is available
    pub idle_scan_budget: Duration,
    /// Viewport scan delay for the timer fallback
    pub timer_scan_delay: Duration,
    /// Script URL substrings identifying the router's own bundle, which is
    /// never treated as a page-owned script
    pub bundle_markers: Vec<String>,
    /// Title used when a fetched page has none
    pub fallback_title: String,
}

impl RouterConfig {
    /// Create a configuration for the given origin with default site layout
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            asset_prefix: "/assets/".to_owned(),
            admin_prefix: "/__admin".to_owned(),
            excluded_extensions: ["pdf", "zip", "tar", "gz", "xml", "txt", "typ", "md", "json"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            cache_ttl: DEFAULT_CACHE_TTL,
            hover_debounce: DEFAULT_HOVER_DEBOUNCE,
            idle_scan_budget: DEFAULT_IDLE_SCAN_BUDGET,
            timer_scan_delay: DEFAULT_TIMER_SCAN_DELAY,
            bundle_markers: vec!["app.js".to_owned(), "app-".to_owned()],
            fallback_title: "Untitled".to_owned(),
        }
    }
}
