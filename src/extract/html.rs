//! HTML text extraction.
//!
//! Documents are parsed with `scraper` (html5ever), which repairs unclosed
//! and mismatched tags the way browsers do, so any input yields a tree.
//!
//! # Body text
//!
//! html5ever always wraps content in `<html>`, `<head>` and `<body>`. Those
//! wrappers are transparent: the top-level nodes are the children of
//! `<head>` and `<body>`. For every top-level element or text node:
//!
//! 1. nodes with the same tag name and identical markup are kept once,
//! 2. the inner text of what remains is written one node per line, in
//!    document order.
//!
//! Script, style, template and comment content never reaches the text.
//!
//! # Title
//!
//! The title selector is a CSS selector (e.g. `h2[class*='content-title']`).
//! The whitespace-normalized text of the first match is the title. No match,
//! an empty match, or an invalid selector falls back to
//! [`TitleGenerator`](super::TitleGenerator).

use ahash::AHashSet;
use log::warn;
use scraper::{ElementRef, Html, Node, Selector};

use crate::document::ExtractedDocument;
use crate::extract::TextExtractor;
use crate::extract::title::TitleGenerator;

/// Elements whose content is never text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements whose children count as top-level nodes.
const TRANSPARENT_ELEMENTS: &[&str] = &["head", "body"];

/// Extracts title and text from HTML documents.
///
/// # Examples
///
/// ```
/// use simple_search::extract::{HtmlTextExtractor, TextExtractor};
///
/// let extractor = HtmlTextExtractor::new();
/// let doc = extractor.extract(
///     "<h1>Fire drill</h1><p>Leave by the <b>east</b> stairs.",
///     "h1",
/// );
///
/// assert_eq!(doc.title, "Fire drill");
/// assert_eq!(doc.body_text, "Fire drill\nLeave by the east stairs.\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlTextExtractor {
    titles: TitleGenerator,
}

impl HtmlTextExtractor {
    /// Create an extractor with the default generated-title length.
    pub fn new() -> Self {
        HtmlTextExtractor::default()
    }

    /// Create an extractor with a custom title generator.
    pub fn with_title_generator(titles: TitleGenerator) -> Self {
        HtmlTextExtractor { titles }
    }

    fn body_text(document: &Html) -> String {
        let mut seen: AHashSet<(String, String)> = AHashSet::new();
        let mut text = String::new();

        for (key, inner_text) in top_level_nodes(document.root_element()) {
            if !seen.insert(key) {
                continue;
            }
            if inner_text.trim().is_empty() {
                continue;
            }
            text.push_str(&inner_text);
            text.push('\n');
        }

        text
    }

    fn selected_title(document: &Html, title_selector: &str) -> Option<String> {
        if title_selector.trim().is_empty() {
            return None;
        }

        let selector = match Selector::parse(title_selector) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Invalid title selector '{title_selector}': {e:?}");
                return None;
            }
        };

        let element = document.select(&selector).next()?;
        let mut raw = String::new();
        collect_text(element, &mut raw);
        let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");

        (!title.is_empty()).then_some(title)
    }
}

impl TextExtractor for HtmlTextExtractor {
    fn extract(&self, content: &str, title_selector: &str) -> ExtractedDocument {
        let document = Html::parse_document(content);
        let body_text = Self::body_text(&document);

        let title = Self::selected_title(&document, title_selector)
            .unwrap_or_else(|| self.titles.generate(&body_text));

        ExtractedDocument { title, body_text }
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Dedup key and inner text of every top-level node, in document order.
fn top_level_nodes(root: ElementRef<'_>) -> Vec<((String, String), String)> {
    let mut nodes = Vec::new();

    for child in root.children() {
        match ElementRef::wrap(child) {
            Some(element) if TRANSPARENT_ELEMENTS.contains(&element.value().name()) => {
                for grandchild in element.children() {
                    if let Some(node) = describe(grandchild.value(), ElementRef::wrap(grandchild)) {
                        nodes.push(node);
                    }
                }
            }
            element => {
                if let Some(node) = describe(child.value(), element) {
                    nodes.push(node);
                }
            }
        }
    }

    nodes
}

fn describe(node: &Node, element: Option<ElementRef<'_>>) -> Option<((String, String), String)> {
    match (node, element) {
        (Node::Text(text), _) => {
            let text: &str = text;
            if text.trim().is_empty() {
                return None;
            }
            Some((("#text".to_string(), text.to_string()), text.to_string()))
        }
        (Node::Element(_), Some(element)) => {
            let name = element.value().name().to_ascii_lowercase();
            if SKIPPED_ELEMENTS.contains(&name.as_str()) {
                return None;
            }
            let mut inner_text = String::new();
            collect_text(element, &mut inner_text);
            Some(((name, element.html()), inner_text))
        }
        _ => None,
    }
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if !SKIPPED_ELEMENTS.contains(&el.name()) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_SELECTOR: &str = "h2[class*='content-title']";

    fn extract(html: &str) -> ExtractedDocument {
        HtmlTextExtractor::new().extract(html, TITLE_SELECTOR)
    }

    #[test]
    fn test_title_from_selector() {
        let doc = extract(
            r#"<html><body>
                <h2 class="page content-title">  Emergency
                   procedures </h2>
                <p>Call the duty officer.</p>
            </body></html>"#,
        );

        assert_eq!(doc.title, "Emergency procedures");
        assert!(doc.body_text.contains("Call the duty officer."));
    }

    #[test]
    fn test_first_match_wins() {
        let doc = extract(
            r#"<h2 class="content-title">First</h2><h2 class="content-title">Second</h2>"#,
        );
        assert_eq!(doc.title, "First");
    }

    #[test]
    fn test_title_generated_when_selector_misses() {
        let doc = extract("<p>Hospital liaison arrangements</p>");
        assert_eq!(doc.title, "Hospital l...");
    }

    #[test]
    fn test_short_body_becomes_title() {
        let doc = extract("<p>Liaison</p>");
        assert_eq!(doc.title, "Liaison");
    }

    #[test]
    fn test_empty_selector_match_falls_back() {
        let doc = extract(r#"<h2 class="content-title">   </h2><p>Body words here</p>"#);
        assert_eq!(doc.title, "Body words...");
    }

    #[test]
    fn test_invalid_selector_falls_back() {
        let doc = HtmlTextExtractor::new().extract("<p>Tiny</p>", "h2[[[");
        assert_eq!(doc.title, "Tiny");
    }

    #[test]
    fn test_one_line_per_top_level_node() {
        let doc = extract("<p>one <em>two</em></p><ul><li>three</li><li>four</li></ul>");
        assert_eq!(doc.body_text, "one two\nthreefour\n");
    }

    #[test]
    fn test_duplicate_nodes_contribute_once() {
        let doc = extract("<div>Menu</div><p>Content</p><DIV>Menu</DIV><div>Menu </div>");
        assert_eq!(doc.body_text, "Menu\nContent\nMenu \n");
    }

    #[test]
    fn test_scripts_and_comments_are_ignored() {
        let doc = extract(
            "<head><style>p { color: red }</style></head>\
             <body><!-- hidden --><script>var x = 1;</script><p>Visible</p></body>",
        );
        assert_eq!(doc.body_text, "Visible\n");
    }

    #[test]
    fn test_head_title_is_indexed() {
        let doc = extract("<html><head><title>Tab name</title></head><body><p>Body</p></body></html>");
        assert_eq!(doc.body_text, "Tab name\nBody\n");
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let doc = extract("<div><p>Unclosed paragraph<span>and span</div><p>Next</i>");
        assert!(doc.body_text.contains("Unclosed paragraph"));
        assert!(doc.body_text.contains("and span"));
        assert!(doc.body_text.contains("Next"));
    }

    #[test]
    fn test_entities_are_decoded() {
        let doc = extract("<p>Fish &amp; chips</p>");
        assert_eq!(doc.body_text, "Fish & chips\n");
    }

    #[test]
    fn test_empty_input() {
        let doc = extract("");
        assert_eq!(doc.title, "");
        assert_eq!(doc.body_text, "");
        assert!(!doc.has_body());
    }

    #[test]
    fn test_bare_text() {
        let doc = extract("just some words");
        assert_eq!(doc.body_text, "just some words\n");
    }
}
