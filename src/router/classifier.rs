//! Link classification
//!
//! Decides whether a URL belongs to the router (same origin, not a static
//! asset, not the admin interface) or must fall through to native browser
//! handling. Pure decision logic, no side effects.

use url::Url;

use crate::router::config::RouterConfig;

/// Classifies candidate navigation targets against the configured origin
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    origin: Url,
    asset_prefix: String,
    admin_prefix: String,
    excluded_extensions: Vec<String>,
}

impl LinkClassifier {
    /// Build a classifier from the router configuration
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            origin: config.origin.clone(),
            asset_prefix: config.asset_prefix.clone(),
            admin_prefix: config.admin_prefix.clone(),
            excluded_extensions: config
                .excluded_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Resolve `href` against the configured origin.
    ///
    /// Relative references resolve from the origin root, the same way the
    /// click surface builds absolute URLs. Unparseable input yields `None`.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.origin.join(href).ok()
    }

    /// Whether the router should handle navigation to `href`.
    ///
    /// Never panics; malformed URLs are treated as external.
    pub fn is_internal(&self, href: &str) -> bool {
        let Some(url) = self.resolve(href) else {
            return false;
        };
        if url.origin() != self.origin.origin() {
            return false;
        }
        let path = url.path();
        if self.has_excluded_extension(path) {
            return false;
        }
        !path.starts_with(self.asset_prefix.as_str()) && !path.starts_with(self.admin_prefix.as_str())
    }

    fn has_excluded_extension(&self, path: &str) -> bool {
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();
        self.excluded_extensions.iter().any(|e| *e == ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LinkClassifier {
        let config = RouterConfig::new(Url::parse("https://example.com").unwrap());
        LinkClassifier::new(&config)
    }

    #[test]
    fn test_same_origin_page_is_internal() {
        let c = classifier();
        assert!(c.is_internal("https://example.com/blog"));
        assert!(c.is_internal("/about"));
        assert!(c.is_internal("posts/2024"));
    }

    #[test]
    fn test_cross_origin_is_external() {
        let c = classifier();
        assert!(!c.is_internal("https://other.com/blog"));
        assert!(!c.is_internal("//other.com/blog"));
        assert!(!c.is_internal("http://example.com/blog")); // scheme downgrade
    }

    #[test]
    fn test_excluded_extensions_fall_through() {
        let c = classifier();
        assert!(!c.is_internal("/files/report.pdf"));
        assert!(!c.is_internal("/files/archive.tar.gz"));
        assert!(!c.is_internal("/feed.xml"));
        assert!(!c.is_internal("/NOTES.MD")); // case-insensitive
    }

    #[test]
    fn test_versioned_path_is_not_an_extension() {
        let c = classifier();
        assert!(c.is_internal("/v1.2/page"));
    }

    #[test]
    fn test_asset_and_admin_prefixes_fall_through() {
        let c = classifier();
        assert!(!c.is_internal("/assets/build/home.js"));
        assert!(!c.is_internal("/__admin"));
        assert!(!c.is_internal("/__admin/posts"));
    }

    #[test]
    fn test_malformed_urls_are_external() {
        let c = classifier();
        assert!(!c.is_internal("http://["));
        assert!(!c.is_internal("mailto:someone@example.com"));
    }

    #[test]
    fn test_resolve_normalizes_relative_hrefs() {
        let c = classifier();
        let url = c.resolve("about").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_fragment_only_href_stays_internal() {
        let c = classifier();
        assert!(c.is_internal("#section"));
    }
}
