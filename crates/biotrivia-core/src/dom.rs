//! Owned markup tree.
//!
//! HTML fragments are parsed with `scraper` and immediately converted into
//! this small, framework-free tree. The normalizer and sectionizer only ever
//! walk [`Element`] values, never the parser's own DOM.

use scraper::{ElementRef, Html};

/// A node of the markup tree: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

/// An element with its tag, identity attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub children: Vec<MarkupNode>,
}

/// Result of parsing an HTML fragment.
#[derive(Debug, Clone)]
pub struct ParsedFragment {
    pub root: Element,
    /// Number of recoverable errors the HTML parser reported.
    pub error_count: usize,
}

/// Parse an HTML fragment into an owned tree rooted at a synthetic `html`
/// element.
pub fn parse_fragment(html: &str) -> ParsedFragment {
    let parsed = Html::parse_fragment(html);
    ParsedFragment {
        root: convert(parsed.root_element()),
        error_count: parsed.errors.len(),
    }
}

fn convert(el: ElementRef<'_>) -> Element {
    let value = el.value();
    let children = el
        .children()
        .filter_map(|child| match ElementRef::wrap(child) {
            Some(child_el) => Some(MarkupNode::Element(convert(child_el))),
            None => child
                .value()
                .as_text()
                .map(|t| MarkupNode::Text((**t).to_owned())),
        })
        .collect();

    Element {
        tag: value.name().to_ascii_lowercase(),
        id: value.attr("id").map(str::to_owned),
        classes: value.classes().map(str::to_owned).collect(),
        children,
    }
}

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "div",
    "dl",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "main",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tr",
    "ul",
];

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// `h1` through `h6`.
    pub fn is_heading_tag(&self) -> bool {
        matches!(self.tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    /// A heading element, or the `mw-heading` wrapper current MediaWiki
    /// output puts around one.
    pub fn is_heading(&self) -> bool {
        self.is_heading_tag() || self.has_class("mw-heading")
    }

    pub fn is_block(&self) -> bool {
        BLOCK_TAGS.contains(&self.tag.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            MarkupNode::Element(e) => Some(e),
            MarkupNode::Text(_) => None,
        })
    }

    /// Concatenated descendant text with no layout applied.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                MarkupNode::Text(t) => out.push_str(t),
                MarkupNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// Descendant text with line breaks around block elements, `br` and
    /// list items. Whitespace is left for the caller to clean.
    pub fn layout_text(&self) -> String {
        let mut out = String::new();
        self.collect_layout(&mut out);
        out
    }

    fn collect_layout(&self, out: &mut String) {
        for child in &self.children {
            match child {
                // formatting whitespace between tags
                MarkupNode::Text(t) if t.trim().is_empty() => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push(' ');
                    }
                }
                MarkupNode::Text(t) => out.push_str(t),
                MarkupNode::Element(e) if e.tag == "br" => out.push('\n'),
                MarkupNode::Element(e) if e.tag == "li" || e.tag == "dd" || e.tag == "dt" => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                    e.collect_layout(out);
                    out.push('\n');
                }
                MarkupNode::Element(e) if e.is_block() => {
                    out.push_str("\n\n");
                    e.collect_layout(out);
                    out.push_str("\n\n");
                }
                MarkupNode::Element(e) => e.collect_layout(out),
            }
        }
    }

    /// First element in document order (self included) matching `pred`.
    pub fn find(&self, pred: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find(pred))
    }

    /// Remove every descendant element matching `pred`, subtree included.
    pub fn remove_where(&mut self, pred: &dyn Fn(&Element) -> bool) {
        self.children.retain(|c| match c {
            MarkupNode::Element(e) => !pred(e),
            MarkupNode::Text(_) => true,
        });
        for child in &mut self.children {
            if let MarkupNode::Element(e) = child {
                e.remove_where(pred);
            }
        }
    }

    /// Find the first element in document order matching `pred`, then drop
    /// it and every sibling after it from its parent. Returns whether a
    /// match was found.
    pub fn truncate_from(&mut self, pred: &dyn Fn(&Element) -> bool) -> bool {
        let mut cut = None;
        for (idx, child) in self.children.iter_mut().enumerate() {
            if let MarkupNode::Element(e) = child {
                if pred(e) {
                    cut = Some(idx);
                    break;
                }
                if e.truncate_from(pred) {
                    return true;
                }
            }
        }
        match cut {
            Some(idx) => {
                self.children.truncate(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_tags_classes_and_text() {
        let parsed = parse_fragment(r#"<div class="a b" id="x"><p>Hi <b>there</b></p></div>"#);
        let div = parsed.root.child_elements().next().unwrap();
        assert_eq!(div.tag, "div");
        assert_eq!(div.id.as_deref(), Some("x"));
        assert!(div.has_class("a") && div.has_class("b"));
        assert_eq!(div.text_content(), "Hi there");
    }

    #[test]
    fn layout_text_separates_blocks() {
        let parsed = parse_fragment("<p>One</p><p>Two<br>Three</p>");
        let text = parsed.root.layout_text();
        assert!(text.contains("One\n\n"));
        assert!(text.contains("Two\nThree"));
    }

    #[test]
    fn remove_where_drops_nested_matches() {
        let mut root = parse_fragment(
            r#"<div><p>Keep<sup class="reference">[1]</sup></p><style>x{}</style></div>"#,
        )
        .root;
        root.remove_where(&|e| e.tag == "style" || e.has_class("reference"));
        assert_eq!(root.text_content(), "Keep");
    }

    #[test]
    fn truncate_from_cuts_following_siblings() {
        let mut root = parse_fragment("<div><p>a</p><h2>Stop</h2><p>b</p></div><p>c</p>").root;
        assert!(root.truncate_from(&|e| e.tag == "h2"));
        assert_eq!(root.text_content(), "ac");
    }

    #[test]
    fn find_is_document_order() {
        let root = parse_fragment("<p id=\"first\">x</p><p id=\"second\">y</p>").root;
        let found = root.find(&|e| e.tag == "p").unwrap();
        assert_eq!(found.id.as_deref(), Some("first"));
    }
}
