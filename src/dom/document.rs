//! Live document model
//!
//! The patchable page the router mutates in place: title, body markup, the
//! stylesheet/script elements currently present, and scroll state. A
//! pending-native-load slot carries the fallback request for the embedder
//! when an in-place navigation cannot complete.

use std::collections::HashSet;

use crate::dom::extract::{self, Anchor};
use crate::security::TrustedHtml;

/// Where the viewport sits after a navigation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScrollTarget {
    /// Document origin
    #[default]
    Top,
    /// An element scrolled into view, by id
    Element(String),
}

/// The live page the router patches in place
#[derive(Debug, Clone)]
pub struct LiveDocument {
    title: String,
    body: TrustedHtml,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
    element_ids: HashSet<String>,
    anchors: Vec<Anchor>,
    scroll: ScrollTarget,
    pending_native_load: Option<String>,
}

impl LiveDocument {
    /// Build a document from an initial title and body
    pub fn new(title: impl Into<String>, body: TrustedHtml) -> Self {
        let element_ids = extract::collect_element_ids(&body);
        let anchors = extract::collect_anchors(&body);
        Self {
            title: title.into(),
            body,
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            element_ids,
            anchors,
            scroll: ScrollTarget::Top,
            pending_native_load: None,
        }
    }

    /// Record stylesheet links already present in the initial page
    pub fn with_stylesheets(mut self, urls: Vec<String>) -> Self {
        self.stylesheets = urls;
        self
    }

    /// Record script elements already present in the initial page
    pub fn with_scripts(mut self, urls: Vec<String>) -> Self {
        self.scripts = urls;
        self
    }

    /// Current document title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current body markup
    pub fn body(&self) -> &TrustedHtml {
        &self.body
    }

    /// Stylesheet URLs currently present, in insertion order
    pub fn stylesheets(&self) -> &[String] {
        &self.stylesheets
    }

    /// Script URLs currently present, in insertion order
    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Anchors in the current body, in document order
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Current scroll target
    pub fn scroll(&self) -> &ScrollTarget {
        &self.scroll
    }

    /// Whether an element with `id` exists in the current body
    pub fn has_element(&self, id: &str) -> bool {
        self.element_ids.contains(id)
    }

    /// Whether a stylesheet with exactly `url` is present
    pub fn has_stylesheet(&self, url: &str) -> bool {
        self.stylesheets.iter().any(|u| u == url)
    }

    /// Whether a script with exactly `url` is present
    pub fn has_script(&self, url: &str) -> bool {
        self.scripts.iter().any(|u| u == url)
    }

    /// Add a stylesheet link element; no-op if the URL is already present
    pub fn insert_stylesheet(&mut self, url: &str) {
        if !self.has_stylesheet(url) {
            self.stylesheets.push(url.to_owned());
        }
    }

    /// Add a script element; no-op if the URL is already present
    pub fn insert_script(&mut self, url: &str) {
        if !self.has_script(url) {
            self.scripts.push(url.to_owned());
        }
    }

    /// Set the document title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the body markup, rederiving element ids and anchors
    pub fn replace_body(&mut self, body: TrustedHtml) {
        self.element_ids = extract::collect_element_ids(&body);
        self.anchors = extract::collect_anchors(&body);
        self.body = body;
    }

    /// Commit title and body together, in one mutation
    pub fn apply_swap(&mut self, title: impl Into<String>, body: TrustedHtml) {
        self.set_title(title);
        self.replace_body(body);
    }

    /// Move the viewport
    pub fn scroll_to(&mut self, target: ScrollTarget) {
        self.scroll = target;
    }

    /// Ask the embedder for a full native load of `url`
    pub fn request_native_load(&mut self, url: &str) {
        self.pending_native_load = Some(url.to_owned());
    }

    /// Native load requested by a failed in-place navigation, if any
    pub fn pending_native_load(&self) -> Option<&str> {
        self.pending_native_load.as_deref()
    }
}
