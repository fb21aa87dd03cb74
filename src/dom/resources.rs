//! Resource reconciliation
//!
//! Given the stylesheet/script URLs an incoming page requires, makes sure
//! each is present in the live document. Missing resources are inserted and
//! their loads awaited together; a failed load degrades the page but never
//! fails the aggregate, which settles once every resource has loaded or
//! errored.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::future::join_all;
use url::Url;

use crate::dom::{self, LiveDocument};
use crate::network::{PageRequest, PageTransport};
use crate::utils::ResourceError;

/// Loads one stylesheet or script, settling on load-or-error
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Load `url`, suspending until the load settles
    async fn load(&self, url: &str) -> Result<(), ResourceError>;
}

/// Loader that fetches resources over the page transport,
/// resolving relative URLs against the configured origin
pub struct TransportResourceLoader {
    transport: Arc<dyn PageTransport>,
    origin: Url,
}

impl TransportResourceLoader {
    /// Create a loader over `transport` for pages served from `origin`
    pub fn new(transport: Arc<dyn PageTransport>, origin: Url) -> Self {
        Self { transport, origin }
    }
}

#[async_trait]
impl ResourceLoader for TransportResourceLoader {
    async fn load(&self, url: &str) -> Result<(), ResourceError> {
        let absolute = self.origin.join(url).map_err(|error| ResourceError {
            url: url.to_owned(),
            reason: error.to_string(),
        })?;
        let response = self
            .transport
            .execute(PageRequest::get(absolute.as_str()))
            .await
            .map_err(|error| ResourceError {
                url: url.to_owned(),
                reason: error.to_string(),
            })?;
        if response.is_success() {
            Ok(())
        } else {
            Err(ResourceError {
                url: url.to_owned(),
                reason: format!("HTTP {}", response.status()),
            })
        }
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Resources newly inserted into the document
    pub inserted: usize,
    /// Inserted resources that loaded
    pub loaded: usize,
    /// Inserted resources that errored
    pub failed: usize,
}

/// Ensures the live document carries the resources an incoming page requires
pub struct ResourceReconciler {
    loader: Arc<dyn ResourceLoader>,
}

impl ResourceReconciler {
    /// Create a reconciler using `loader` for missing resources
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self { loader }
    }

    /// Ensure every stylesheet in `urls` is present in the document.
    ///
    /// Settles once every newly inserted link has loaded or errored;
    /// pre-existing stylesheets (exact URL match) are never re-inserted.
    pub async fn ensure_stylesheets(
        &self,
        document: &Mutex<LiveDocument>,
        urls: &[String],
    ) -> ReconcileReport {
        let missing = {
            let mut doc = dom::lock(document);
            let missing: Vec<String> = urls
                .iter()
                .filter(|url| !doc.has_stylesheet(url))
                .cloned()
                .collect();
            // The element exists as soon as it is inserted; presence is keyed
            // on the element, not on the load outcome.
            for url in &missing {
                doc.insert_stylesheet(url);
            }
            missing
        };
        self.settle(missing).await
    }

    /// Ensure every script in `urls` is present in the document.
    ///
    /// Same settling contract as [`ResourceReconciler::ensure_stylesheets`];
    /// scripts execute asynchronously and never block one another.
    pub async fn ensure_scripts(
        &self,
        document: &Mutex<LiveDocument>,
        urls: &[String],
    ) -> ReconcileReport {
        let missing = {
            let mut doc = dom::lock(document);
            let missing: Vec<String> = urls
                .iter()
                .filter(|url| !doc.has_script(url))
                .cloned()
                .collect();
            for url in &missing {
                doc.insert_script(url);
            }
            missing
        };
        self.settle(missing).await
    }

    async fn settle(&self, urls: Vec<String>) -> ReconcileReport {
        let mut report = ReconcileReport {
            inserted: urls.len(),
            ..Default::default()
        };
        let loads = urls.iter().map(|url| self.loader.load(url));
        for outcome in join_all(loads).await {
            match outcome {
                Ok(()) => report.loaded += 1,
                Err(error) => {
                    log::warn!("resource load failed, continuing: {error}");
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::TrustedHtml;
    use std::collections::HashSet;

    struct CountingLoader {
        calls: Mutex<Vec<String>>,
        fail: HashSet<String>,
    }

    impl CountingLoader {
        fn new(fail: &[&str]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: fail.iter().map(|s| (*s).to_owned()).collect(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResourceLoader for CountingLoader {
        async fn load(&self, url: &str) -> Result<(), ResourceError> {
            self.calls.lock().unwrap().push(url.to_owned());
            if self.fail.contains(url) {
                Err(ResourceError {
                    url: url.to_owned(),
                    reason: "HTTP 404".to_owned(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn document() -> Mutex<LiveDocument> {
        Mutex::new(LiveDocument::new(
            "Home",
            TrustedHtml::from_sanitized("<p>home</p>".to_owned()),
        ))
    }

    #[test]
    fn test_existing_stylesheets_are_not_reinserted() {
        tokio_test::block_on(async {
            let loader = Arc::new(CountingLoader::new(&[]));
            let reconciler = ResourceReconciler::new(Arc::clone(&loader) as Arc<dyn ResourceLoader>);
            let doc = document();
            dom::lock(&doc).insert_stylesheet("/site.css");

            let report = reconciler
                .ensure_stylesheets(&doc, &["/site.css".to_owned(), "/blog.css".to_owned()])
                .await;

            assert_eq!(report, ReconcileReport { inserted: 1, loaded: 1, failed: 0 });
            assert_eq!(loader.calls(), ["/blog.css"]);
            assert_eq!(dom::lock(&doc).stylesheets(), ["/site.css", "/blog.css"]);
        });
    }

    #[test]
    fn test_failed_load_does_not_fail_the_aggregate() {
        tokio_test::block_on(async {
            let loader = Arc::new(CountingLoader::new(&["/missing.css"]));
            let reconciler = ResourceReconciler::new(Arc::clone(&loader) as Arc<dyn ResourceLoader>);
            let doc = document();

            let report = reconciler
                .ensure_stylesheets(&doc, &["/missing.css".to_owned(), "/ok.css".to_owned()])
                .await;

            assert_eq!(report, ReconcileReport { inserted: 2, loaded: 1, failed: 1 });
            // The element stays in the document even though its load failed
            assert!(dom::lock(&doc).has_stylesheet("/missing.css"));
        });
    }

    #[test]
    fn test_scripts_reconcile_independently() {
        tokio_test::block_on(async {
            let loader = Arc::new(CountingLoader::new(&[]));
            let reconciler = ResourceReconciler::new(Arc::clone(&loader) as Arc<dyn ResourceLoader>);
            let doc = document();
            dom::lock(&doc).insert_script("/gallery.js");

            let report = reconciler
                .ensure_scripts(&doc, &["/gallery.js".to_owned(), "/embed.js".to_owned()])
                .await;

            assert_eq!(report, ReconcileReport { inserted: 1, loaded: 1, failed: 0 });
            assert_eq!(loader.calls(), ["/embed.js"]);
        });
    }

    #[test]
    fn test_empty_requirements_settle_immediately() {
        tokio_test::block_on(async {
            let loader = Arc::new(CountingLoader::new(&[]));
            let reconciler = ResourceReconciler::new(Arc::clone(&loader) as Arc<dyn ResourceLoader>);
            let doc = document();

            let report = reconciler.ensure_stylesheets(&doc, &[]).await;

            assert_eq!(report, ReconcileReport::default());
            assert!(loader.calls().is_empty());
        });
    }
}
