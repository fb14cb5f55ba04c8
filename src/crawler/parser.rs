//! Sitemap XML parser
//!
//! Extracts `<loc>` values from a sitemaps.org `<urlset>` document. Parsing is
//! best effort: a document that is not well-formed XML is rejected, but shape
//! problems (unexpected root or child tags, missing `<loc>`) are logged and
//! skipped.
//!
//! Tags are compared in Clark notation, `{namespace}local`, after namespace
//! resolution. Un-namespaced tags are just their local name.

use crate::config::{RootCheck, SITEMAP_NAMESPACE};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

/// Reasons a sitemap body could not be read as XML
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("Content found after the root element")]
    TrailingContent,

    #[error("Unbound namespace prefix: {0}")]
    UnboundPrefix(String),
}

/// Result type for parse operations
pub type ParseResult<T> = Result<T, ParseFailure>;

/// A parsed element: resolved tag, leading text, child elements
#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    fn new(tag: String) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Appends character data, unless a child element has already started
    fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }
}

/// Extracts locations from sitemap documents
#[derive(Debug, Clone)]
pub struct SitemapParser {
    root_check: RootCheck,
    urlset_tag: String,
    url_tag: String,
    loc_tag: String,
}

impl Default for SitemapParser {
    fn default() -> Self {
        Self::new(RootCheck::default())
    }
}

impl SitemapParser {
    pub fn new(root_check: RootCheck) -> Self {
        Self {
            root_check,
            urlset_tag: clark_name(SITEMAP_NAMESPACE, "urlset"),
            url_tag: clark_name(SITEMAP_NAMESPACE, "url"),
            loc_tag: clark_name(SITEMAP_NAMESPACE, "loc"),
        }
    }

    /// Parses `xml` and returns its locations in document order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Locations found (duplicates kept, possibly empty)
    /// * `Err(ParseFailure)` - The body is not well-formed XML
    ///
    /// # Example
    ///
    /// ```
    /// use sitemap_harvest::crawler::SitemapParser;
    ///
    /// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    ///   <url><loc>https://example.com/page</loc></url>
    /// </urlset>"#;
    ///
    /// let locations = SitemapParser::default().parse(xml).unwrap();
    /// assert_eq!(locations, vec!["https://example.com/page"]);
    /// ```
    pub fn parse(&self, xml: &str) -> ParseResult<Vec<String>> {
        let root = parse_document(xml)?;

        if !self.root_accepted(&root.tag) {
            return Ok(Vec::new());
        }

        let mut locations = Vec::new();
        for child in &root.children {
            if child.tag != self.url_tag {
                tracing::warn!(
                    "Expecting child node to be {}, got {} - {:?}",
                    self.url_tag,
                    child.tag,
                    child.text.as_deref().unwrap_or_default()
                );
            }

            match child.children.iter().find(|c| c.tag == self.loc_tag) {
                Some(loc) => locations.push(loc.text.clone().unwrap_or_default()),
                None => tracing::warn!("No loc object found in <{}>", child.tag),
            }
        }

        Ok(locations)
    }

    fn root_accepted(&self, tag: &str) -> bool {
        match self.root_check {
            RootCheck::Legacy => {
                if tag == "urlset" {
                    tracing::warn!("Expecting root to be urlset, got {}", tag);
                    return false;
                }
                true
            }
            RootCheck::Strict => {
                if tag != self.urlset_tag {
                    tracing::warn!("Expecting root to be {}, got {}", self.urlset_tag, tag);
                    return false;
                }
                true
            }
        }
    }
}

fn clark_name(namespace: &str, local: &str) -> String {
    format!("{{{}}}{}", namespace, local)
}

/// Resolves the tag of a start event into Clark notation
fn resolved_tag(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> ParseResult<String> {
    let local_name = start.local_name();
    let local = std::str::from_utf8(local_name.as_ref())
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

    match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            let uri =
                std::str::from_utf8(uri).map_err(|e| ParseFailure::Malformed(e.to_string()))?;
            Ok(clark_name(uri, local))
        }
        ResolveResult::Unbound => Ok(local.to_string()),
        ResolveResult::Unknown(prefix) => Err(ParseFailure::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

/// Builds the element tree of a whole document
fn parse_document(xml: &str) -> ParseResult<Element> {
    let mut reader = NsReader::from_str(xml);

    // Open elements, innermost last
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                if root.is_some() {
                    return Err(ParseFailure::TrailingContent);
                }

                let element = Element::new(resolved_tag(ns, start)?);
                if matches!(event, Event::Start(_)) {
                    stack.push(element);
                } else {
                    close_element(element, &mut stack, &mut root);
                }
            }
            Event::End(_) => {
                // quick-xml has already matched the end tag against its start
                if let Some(element) = stack.pop() {
                    close_element(element, &mut stack, &mut root);
                }
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

                match stack.last_mut() {
                    Some(open) => open.push_text(&text),
                    None if text.trim().is_empty() => {}
                    None if root.is_some() => return Err(ParseFailure::TrailingContent),
                    None => {
                        return Err(ParseFailure::Malformed(
                            "text before the root element".to_string(),
                        ))
                    }
                }
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data)
                    .map_err(|e| ParseFailure::Malformed(e.to_string()))?;

                match stack.last_mut() {
                    Some(open) => open.push_text(text),
                    None => return Err(ParseFailure::TrailingContent),
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseFailure::UnclosedElement(open.tag));
    }

    root.ok_or(ParseFailure::NoRootElement)
}

/// Attaches a finished element to its parent, or makes it the root
fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
