//! Fetched-page extraction
//!
//! Parses a full HTML document with html5ever and pulls out what the router
//! needs: the title, the body's inner markup, and the stylesheet/script URLs
//! the page requires. Also provides the fragment-level scans the live
//! document runs after each swap (element ids, anchors).

use std::cell::RefCell;
use std::collections::HashSet;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::security::TrustedHtml;
use crate::utils::MarkupError;

/// Router-relevant content of a fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtract {
    /// Document title, if the page declares one
    pub title: Option<String>,
    /// Body inner markup
    pub body: TrustedHtml,
    /// Ordered stylesheet hrefs
    pub stylesheets: Vec<String>,
    /// Ordered page-owned script srcs
    pub scripts: Vec<String>,
}

/// An anchor found in a body fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The anchor's href, as written
    pub href: String,
    /// Whether the anchor opts into viewport prefetch (`data-prefetch="true"`)
    pub prefetch_hint: bool,
}

/// Extract router-relevant content from a full page document.
///
/// `bundle_markers` are URL substrings identifying the router's own bundle;
/// matching scripts are dropped from the requirement list so the router never
/// reloads itself.
pub fn extract_page(
    html: &TrustedHtml,
    bundle_markers: &[String],
) -> Result<PageExtract, MarkupError> {
    let dom = parse(html.as_str())?;
    let title = find_title(&dom.document).filter(|t| !t.is_empty());
    let body = find_element(&dom.document, "body").ok_or(MarkupError::MissingBody)?;
    let body_html = serialize_children(&body)?;

    let mut stylesheets = Vec::new();
    let mut scripts = Vec::new();
    collect_resources(&dom.document, bundle_markers, &mut stylesheets, &mut scripts);

    Ok(PageExtract {
        title,
        body: TrustedHtml::from_sanitized(body_html),
        stylesheets,
        scripts,
    })
}

/// Element ids present in a body fragment
pub fn collect_element_ids(fragment: &TrustedHtml) -> HashSet<String> {
    let Ok(dom) = parse(fragment.as_str()) else {
        return HashSet::new();
    };
    let mut ids = HashSet::new();
    collect_ids_from(&dom.document, &mut ids);
    ids
}

/// Anchors present in a body fragment, in document order
pub fn collect_anchors(fragment: &TrustedHtml) -> Vec<Anchor> {
    let Ok(dom) = parse(fragment.as_str()) else {
        return Vec::new();
    };
    let mut anchors = Vec::new();
    collect_anchors_from(&dom.document, &mut anchors);
    anchors
}

fn parse(html: &str) -> Result<RcDom, MarkupError> {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|error| MarkupError::Parse(error.to_string()))
}

fn serialize_children(handle: &Handle) -> Result<String, MarkupError> {
    let mut buf = Vec::new();
    let serializable = SerializableHandle::from(handle.clone());
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut buf, &serializable, opts)
        .map_err(|error| MarkupError::Parse(error.to_string()))?;
    String::from_utf8(buf).map_err(|error| MarkupError::Parse(error.to_string()))
}

fn attr_value(attrs: &RefCell<Vec<Attribute>>, name: &str) -> Option<String> {
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref().eq_ignore_ascii_case(name))
        .map(|attr| attr.value.to_string())
}

fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

fn find_element(handle: &Handle, local: &str) -> Option<Handle> {
    if element_name(handle).as_deref() == Some(local) {
        return Some(handle.clone());
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, local) {
            return Some(found);
        }
    }
    None
}

fn find_title(handle: &Handle) -> Option<String> {
    let title = find_element(handle, "title")?;
    let mut text = String::new();
    for child in title.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            text.push_str(&contents.borrow());
        }
    }
    Some(text.trim().to_owned())
}

fn collect_resources(
    handle: &Handle,
    bundle_markers: &[String],
    stylesheets: &mut Vec<String>,
    scripts: &mut Vec<String>,
) {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        match name.local.as_ref() {
            "link" => {
                let rel = attr_value(attrs, "rel").unwrap_or_default();
                if rel.eq_ignore_ascii_case("stylesheet") {
                    if let Some(href) = attr_value(attrs, "href").filter(|h| !h.is_empty()) {
                        stylesheets.push(href);
                    }
                }
            }
            "script" => {
                if let Some(src) = attr_value(attrs, "src").filter(|s| !s.is_empty()) {
                    if !is_bundle(&src, bundle_markers) {
                        scripts.push(src);
                    }
                }
            }
            _ => {}
        }
    }
    for child in handle.children.borrow().iter() {
        collect_resources(child, bundle_markers, stylesheets, scripts);
    }
}

fn is_bundle(src: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| src.contains(marker.as_str()))
}

fn collect_ids_from(handle: &Handle, ids: &mut HashSet<String>) {
    if let NodeData::Element { attrs, .. } = &handle.data {
        if let Some(id) = attr_value(attrs, "id").filter(|id| !id.is_empty()) {
            ids.insert(id);
        }
    }
    for child in handle.children.borrow().iter() {
        collect_ids_from(child, ids);
    }
}

fn collect_anchors_from(handle: &Handle, anchors: &mut Vec<Anchor>) {
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        if name.local.as_ref() == "a" {
            if let Some(href) = attr_value(attrs, "href").filter(|h| !h.is_empty()) {
                let prefetch_hint = attr_value(attrs, "data-prefetch")
                    .is_some_and(|v| v.eq_ignore_ascii_case("true"));
                anchors.push(Anchor {
                    href,
                    prefetch_hint,
                });
            }
        }
    }
    for child in handle.children.borrow().iter() {
        collect_anchors_from(child, anchors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trusted(html: &str) -> TrustedHtml {
        TrustedHtml::from_sanitized(html.to_owned())
    }

    fn markers() -> Vec<String> {
        vec!["app.js".to_owned(), "app-".to_owned()]
    }

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Blog - Example</title>
  <link rel="stylesheet" href="/assets/build/site.css">
  <link rel="stylesheet" href="/assets/build/blog.css">
  <link rel="icon" href="/favicon.ico">
  <script src="/assets/build/app.js"></script>
</head>
<body><article id="post"><p>hello</p></article><script src="/assets/build/gallery.js"></script></body>
</html>"#;

    #[test]
    fn test_extracts_title_body_and_resources() {
        let extract = extract_page(&trusted(PAGE), &markers()).unwrap();
        assert_eq!(extract.title.as_deref(), Some("Blog - Example"));
        assert_eq!(
            extract.stylesheets,
            vec!["/assets/build/site.css", "/assets/build/blog.css"]
        );
        assert_eq!(extract.scripts, vec!["/assets/build/gallery.js"]);
        assert!(extract.body.as_str().contains(r#"<article id="post"><p>hello</p></article>"#));
        assert!(!extract.body.as_str().contains("<body"));
    }

    #[test]
    fn test_router_bundle_is_excluded() {
        let html = r#"<html><head>
            <script src="/assets/build/app.js"></script>
            <script src="/assets/build/app-3f2a91.js"></script>
            <script src="/assets/build/gallery.js"></script>
        </head><body></body></html>"#;
        let extract = extract_page(&trusted(html), &markers()).unwrap();
        assert_eq!(extract.scripts, vec!["/assets/build/gallery.js"]);
    }

    #[test]
    fn test_missing_title_is_none() {
        let extract = extract_page(&trusted("<html><body><p>x</p></body></html>"), &markers()).unwrap();
        assert_eq!(extract.title, None);
    }

    #[test]
    fn test_empty_title_is_none() {
        let extract =
            extract_page(&trusted("<html><head><title>  </title></head><body></body></html>"), &markers())
                .unwrap();
        assert_eq!(extract.title, None);
    }

    #[test]
    fn test_bare_fragment_still_gets_a_body() {
        // html5ever synthesizes html/body around bare content
        let extract = extract_page(&trusted("<p>loose</p>"), &markers()).unwrap();
        assert!(extract.body.as_str().contains("<p>loose</p>"));
    }

    #[test]
    fn test_non_stylesheet_links_are_ignored() {
        let html = r#"<html><head><link rel="preload" href="/x.css"></head><body></body></html>"#;
        let extract = extract_page(&trusted(html), &markers()).unwrap();
        assert!(extract.stylesheets.is_empty());
    }

    #[test]
    fn test_collect_element_ids() {
        let ids = collect_element_ids(&trusted(
            r#"<div id="top"><span id="inner"></span></div><p>no id</p>"#,
        ));
        assert!(ids.contains("top"));
        assert!(ids.contains("inner"));
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_collect_anchors_with_prefetch_hint() {
        let anchors = collect_anchors(&trusted(
            r#"<a href="/about" data-prefetch="true">About</a>
               <a href="/blog">Blog</a>
               <a data-prefetch="true">no href</a>"#,
        ));
        assert_eq!(
            anchors,
            vec![
                Anchor {
                    href: "/about".to_owned(),
                    prefetch_hint: true
                },
                Anchor {
                    href: "/blog".to_owned(),
                    prefetch_hint: false
                },
            ]
        );
    }
}
