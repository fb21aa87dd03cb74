//! Navigation orchestration
//!
//! [`NavigationService`] owns the router state (page cache, prefetch set,
//! session history, live document, in-flight flag) and drives the pipeline
//! for each request: fetch → stylesheet reconciliation → swap → script
//! reconciliation → reinitialize → scroll → history update. A request
//! arriving while another is serviced is dropped, not queued.

mod classifier;
pub mod config;
mod history;
mod prefetch;
mod state;

pub use classifier::LinkClassifier;
pub use config::RouterConfig;
pub use history::{HistoryEntry, PopStateEvent, SessionHistory};
pub use prefetch::PrefetchScheduler;
pub use state::{NavState, NavigationOutcome};

use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;

use crate::dom::{
    self, LiveDocument, ResourceLoader, ResourceReconciler, ScrollTarget, TransportResourceLoader,
};
use crate::network::{HttpTransport, PageCache, PageEntry, PageFetcher, PageTransport};
use crate::platform::{Capabilities, ScanSchedule, SwapStrategy};
use crate::security::{MarkupPolicy, PassthroughPolicy};
use crate::utils::Result;

use state::NavCell;

/// Hook invoked after each successful DOM swap.
/// Must be idempotent: the router calls it repeatedly, once per swap.
pub type ReinitializeHook = Arc<dyn Fn() + Send + Sync>;

/// Injected collaborators and the platform snapshot for a service instance
pub struct Collaborators {
    /// Network transport for pages and resources
    pub transport: Arc<dyn PageTransport>,
    /// Resource loader; defaults to loading over `transport`
    pub loader: Option<Arc<dyn ResourceLoader>>,
    /// Markup policy gating fetched documents
    pub policy: Arc<dyn MarkupPolicy>,
    /// Post-swap reinitialization hook
    pub reinitialize: ReinitializeHook,
    /// Platform capabilities probed by the embedder
    pub capabilities: Capabilities,
}

impl Collaborators {
    /// Default collaborators over the given transport
    pub fn with_transport(transport: Arc<dyn PageTransport>) -> Self {
        Self {
            transport,
            loader: None,
            policy: Arc::new(PassthroughPolicy),
            reinitialize: Arc::new(|| {}),
            capabilities: Capabilities::default(),
        }
    }
}

/// The navigation engine: one instance per page session, initialized once at
/// startup and torn down implicitly on unload
pub struct NavigationService {
    config: RouterConfig,
    classifier: LinkClassifier,
    cache: PageCache,
    fetcher: Arc<PageFetcher>,
    prefetcher: PrefetchScheduler,
    reconciler: ResourceReconciler,
    document: Mutex<LiveDocument>,
    history: Mutex<SessionHistory>,
    nav: NavCell,
    swap: SwapStrategy,
    scan: ScanSchedule,
    reinitialize: ReinitializeHook,
}

impl NavigationService {
    /// Initialize with the default collaborators (HTTP transport with a
    /// cookie store, passthrough markup policy, no-op reinitialize hook)
    pub fn init(config: RouterConfig, current_url: Url, document: LiveDocument) -> Result<Arc<Self>> {
        let transport: Arc<dyn PageTransport> = Arc::new(HttpTransport::new()?);
        Ok(Self::init_with(
            config,
            current_url,
            document,
            Collaborators::with_transport(transport),
        ))
    }

    /// Initialize with explicit collaborators
    pub fn init_with(
        config: RouterConfig,
        current_url: Url,
        document: LiveDocument,
        collaborators: Collaborators,
    ) -> Arc<Self> {
        let classifier = LinkClassifier::new(&config);
        let cache = PageCache::new(config.cache_ttl);
        let fetcher = Arc::new(PageFetcher::new(
            Arc::clone(&collaborators.transport),
            collaborators.policy,
            cache.clone(),
            config.bundle_markers.clone(),
            config.fallback_title.clone(),
        ));
        let loader = collaborators.loader.unwrap_or_else(|| {
            Arc::new(TransportResourceLoader::new(
                Arc::clone(&collaborators.transport),
                config.origin.clone(),
            ))
        });

        // Replace the initial entry so the very first back-navigation lands
        // on a well-formed state object.
        let mut history = SessionHistory::new(current_url.as_str());
        history.replace(
            current_url.as_str(),
            SessionHistory::state_for(current_url.as_str()),
        );

        let swap = SwapStrategy::select(&collaborators.capabilities);
        let scan = ScanSchedule::select(
            &collaborators.capabilities,
            config.idle_scan_budget,
            config.timer_scan_delay,
        );

        Arc::new(Self {
            prefetcher: PrefetchScheduler::new(cache.clone(), Arc::clone(&fetcher)),
            reconciler: ResourceReconciler::new(loader),
            classifier,
            cache,
            fetcher,
            document: Mutex::new(document),
            history: Mutex::new(history),
            nav: NavCell::default(),
            swap,
            scan,
            reinitialize: collaborators.reinitialize,
            config,
        })
    }

    /// Navigate to `url`.
    ///
    /// `push` distinguishes user navigation (a new history entry) from
    /// history-driven replay (popstate), which never pushes and always
    /// re-renders even for the current URL. All failures end in a native-load
    /// fallback, never an error.
    pub async fn navigate(&self, url: &str, push: bool) -> NavigationOutcome {
        let Some(_guard) = self.nav.begin() else {
            log::debug!("navigation to {url} dropped: one already in flight");
            return NavigationOutcome::Dropped;
        };

        let Some(target) = self.classifier.resolve(url) else {
            log::warn!("unresolvable navigation target {url}, requesting native load");
            dom::lock(&self.document).request_native_load(url);
            return NavigationOutcome::FellBack;
        };

        if push && target.as_str() == self.current_location() {
            log::debug!("already at {target}, nothing to do");
            return NavigationOutcome::AlreadyCurrent;
        }

        match self.perform(&target).await {
            Ok(()) => {
                if push {
                    self.lock_history()
                        .push(target.as_str(), SessionHistory::state_for(target.as_str()));
                }
                NavigationOutcome::Completed
            }
            Err(error) => {
                log::warn!("in-place navigation to {target} failed, falling back to a full load: {error}");
                dom::lock(&self.document).request_native_load(target.as_str());
                NavigationOutcome::FellBack
            }
        }
    }

    async fn perform(&self, target: &Url) -> Result<()> {
        let entry = self.fetcher.fetch_page(target.as_str()).await?;

        // Stylesheets settle before the swap (no unstyled flash), scripts
        // after it (page behavior wires against the new markup).
        self.reconciler
            .ensure_stylesheets(&self.document, &entry.stylesheets)
            .await;
        self.commit_swap(&entry);
        self.reconciler
            .ensure_scripts(&self.document, &entry.scripts)
            .await;

        (self.reinitialize)();
        self.apply_scroll(target);
        Ok(())
    }

    fn commit_swap(&self, entry: &PageEntry) {
        match self.swap {
            SwapStrategy::Transition => {
                // One critical section: title and body change together.
                let mut doc = dom::lock(&self.document);
                doc.apply_swap(entry.title.clone(), entry.body.clone());
            }
            SwapStrategy::Direct => {
                dom::lock(&self.document).set_title(entry.title.clone());
                dom::lock(&self.document).replace_body(entry.body.clone());
            }
        }
    }

    fn apply_scroll(&self, target: &Url) {
        let mut doc = dom::lock(&self.document);
        let scroll = match target.fragment() {
            Some(id) if !id.is_empty() && doc.has_element(id) => ScrollTarget::Element(id.to_owned()),
            _ => ScrollTarget::Top,
        };
        doc.scroll_to(scroll);
    }

    /// Fire-and-forget cache warming for `url`; errors are swallowed
    pub async fn prefetch(&self, url: &str) {
        let Some(target) = self.classifier.resolve(url) else {
            return;
        };
        self.prefetcher.prefetch(target.as_str()).await;
    }

    /// Handle a popstate event: re-enter the controller without pushing.
    /// A state object without a URL falls back to the current location.
    pub async fn handle_popstate(&self, event: PopStateEvent) -> NavigationOutcome {
        let url = event
            .url()
            .map(str::to_owned)
            .unwrap_or_else(|| self.current_location());
        self.navigate(&url, false).await
    }

    /// Traverse one entry back, as the browser gesture would.
    /// `None` at the start of the stack.
    pub async fn history_back(&self) -> Option<NavigationOutcome> {
        let event = self.lock_history().back()?;
        Some(self.handle_popstate(event).await)
    }

    /// Traverse one entry forward. `None` at the end of the stack.
    pub async fn history_forward(&self) -> Option<NavigationOutcome> {
        let event = self.lock_history().forward()?;
        Some(self.handle_popstate(event).await)
    }

    /// URL of the current history entry
    pub fn current_location(&self) -> String {
        self.lock_history().current().url.clone()
    }

    /// Number of session-history entries
    pub fn history_len(&self) -> usize {
        self.lock_history().len()
    }

    /// Current controller state
    pub fn state(&self) -> NavState {
        self.nav.state()
    }

    /// The live document this service patches
    pub fn document(&self) -> &Mutex<LiveDocument> {
        &self.document
    }

    /// The page cache
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// The link classifier
    pub fn classifier(&self) -> &LinkClassifier {
        &self.classifier
    }

    /// The configuration this service was initialized with
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The viewport-scan schedule selected at initialization
    pub fn scan_schedule(&self) -> ScanSchedule {
        self.scan
    }

    fn lock_history(&self) -> MutexGuard<'_, SessionHistory> {
        match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{PageRequest, TransportResponse};
    use crate::security::TrustedHtml;
    use crate::utils::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSite {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl PageTransport for FakeSite {
        async fn execute(&self, request: PageRequest) -> std::result::Result<TransportResponse, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if request.url().contains("/broken") {
                return Ok(TransportResponse::new(500, "server error"));
            }
            let body = format!(
                "<html><head><title>Fetched</title></head><body><p>{}</p></body></html>",
                request.url()
            );
            Ok(TransportResponse::new(200, body))
        }
    }

    fn service() -> (Arc<NavigationService>, Arc<FakeSite>) {
        let site = Arc::new(FakeSite {
            fetches: AtomicUsize::new(0),
        });
        let origin = Url::parse("https://example.com").unwrap();
        let document = LiveDocument::new(
            "Home",
            TrustedHtml::from_sanitized("<main id=\"home\">home</main>".to_owned()),
        );
        let service = NavigationService::init_with(
            RouterConfig::new(origin.clone()),
            origin,
            document,
            Collaborators::with_transport(Arc::clone(&site) as Arc<dyn PageTransport>),
        );
        (service, site)
    }

    #[tokio::test]
    async fn test_navigate_swaps_and_pushes_history() {
        let (service, site) = service();

        let outcome = service.navigate("/about", true).await;

        assert_eq!(outcome, NavigationOutcome::Completed);
        assert_eq!(site.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(service.history_len(), 2);
        assert_eq!(service.current_location(), "https://example.com/about");
        let doc = dom::lock(service.document());
        assert_eq!(doc.title(), "Fetched");
        assert!(doc.body().as_str().contains("https://example.com/about"));
    }

    #[tokio::test]
    async fn test_push_to_current_location_is_a_noop() {
        let (service, site) = service();

        let outcome = service.navigate("/", true).await;

        assert_eq!(outcome, NavigationOutcome::AlreadyCurrent);
        assert_eq!(site.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(dom::lock(service.document()).title(), "Home");
    }

    #[tokio::test]
    async fn test_popstate_to_current_location_rerenders() {
        let (service, site) = service();

        let outcome = service.navigate("/", false).await;

        assert_eq!(outcome, NavigationOutcome::Completed);
        assert_eq!(site.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(dom::lock(service.document()).title(), "Fetched");
    }

    #[tokio::test]
    async fn test_failed_fetch_requests_native_load() {
        let (service, _site) = service();

        let outcome = service.navigate("/broken", true).await;

        assert_eq!(outcome, NavigationOutcome::FellBack);
        let doc = dom::lock(service.document());
        assert_eq!(doc.pending_native_load(), Some("https://example.com/broken"));
        // No partial swap, no history entry.
        assert_eq!(doc.title(), "Home");
        drop(doc);
        assert_eq!(service.history_len(), 1);
        assert_eq!(service.state(), NavState::Idle);
    }

    #[tokio::test]
    async fn test_unresolvable_target_requests_native_load() {
        let (service, site) = service();

        let outcome = service.navigate("http://[", true).await;

        assert_eq!(outcome, NavigationOutcome::FellBack);
        assert_eq!(site.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(
            dom::lock(service.document()).pending_native_load(),
            Some("http://[")
        );
    }

    #[tokio::test]
    async fn test_history_back_reenters_without_pushing() {
        let (service, site) = service();
        service.navigate("/a", true).await;
        assert_eq!(service.history_len(), 2);

        let outcome = service.history_back().await;

        assert_eq!(outcome, Some(NavigationOutcome::Completed));
        assert_eq!(service.current_location(), "https://example.com/");
        assert_eq!(service.history_len(), 2);
        assert_eq!(site.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fragment_scrolls_to_element_in_new_dom() {
        struct AnchorSite;
        #[async_trait]
        impl PageTransport for AnchorSite {
            async fn execute(&self, _request: PageRequest) -> std::result::Result<TransportResponse, FetchError> {
                Ok(TransportResponse::new(
                    200,
                    "<html><head><title>Doc</title></head><body><h2 id=\"usage\">usage</h2></body></html>",
                ))
            }
        }
        let origin = Url::parse("https://example.com").unwrap();
        let document = LiveDocument::new(
            "Home",
            TrustedHtml::from_sanitized("<main>home</main>".to_owned()),
        );
        let service = NavigationService::init_with(
            RouterConfig::new(origin.clone()),
            origin,
            document,
            Collaborators::with_transport(Arc::new(AnchorSite)),
        );

        service.navigate("/docs#usage", true).await;
        assert_eq!(
            *dom::lock(service.document()).scroll(),
            ScrollTarget::Element("usage".to_owned())
        );

        service.navigate("/docs#missing", false).await;
        assert_eq!(*dom::lock(service.document()).scroll(), ScrollTarget::Top);
    }
}
