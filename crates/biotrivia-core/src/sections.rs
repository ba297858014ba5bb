//! Splits structural markup into ordered heading/body sections.

use crate::dom::Element;
use crate::model::{RawMarkup, Section};
use crate::normalize::{clean_text, heading_title, normalize_markup, prepared_tree, strip_citations};

const LEADING_HEADING: &str = "Introduction";
const UNTITLED_HEADING: &str = "Untitled";
const FALLBACK_HEADING: &str = "Content";

/// Elements whose text is appended to the current section body.
const BODY_TAGS: &[&str] = &["p", "ul", "ol", "dl", "blockquote", "pre"];

/// Split a rendered HTML fragment into sections.
///
/// Content before the first heading lands in an "Introduction" section.
/// Sections with an empty body are dropped. When nothing survives, the
/// whole normalized text is returned as a single "Content" section.
pub fn to_sections(fragment: &str) -> Vec<Section> {
    let tree = prepared_tree(fragment);
    let mut walker = SectionWalker::default();
    walker.walk(&tree);
    let sections = walker.finish();

    if !sections.is_empty() {
        return sections;
    }
    let text = normalize_markup(&RawMarkup::Structural(fragment.to_string()));
    if text.is_empty() {
        tracing::debug!("fragment produced no sections and no text");
        return Vec::new();
    }
    vec![Section::new(FALLBACK_HEADING, text)]
}

struct SectionWalker {
    current: Section,
    done: Vec<Section>,
}

impl Default for SectionWalker {
    fn default() -> Self {
        Self {
            current: Section::new(LEADING_HEADING, ""),
            done: Vec::new(),
        }
    }
}

impl SectionWalker {
    fn walk(&mut self, el: &Element) {
        for child in el.child_elements() {
            if child.is_heading() {
                self.start_section(child);
            } else if BODY_TAGS.contains(&child.tag.as_str()) {
                self.append_block(child);
            } else {
                self.walk(child);
            }
        }
    }

    fn start_section(&mut self, heading: &Element) {
        let title = heading_title(heading);
        let title = if title.is_empty() {
            UNTITLED_HEADING.to_string()
        } else {
            title
        };
        let previous = std::mem::replace(&mut self.current, Section::new(title, ""));
        self.push(previous);
    }

    fn append_block(&mut self, block: &Element) {
        let mut copy = block.clone();
        copy.remove_where(&|e| e.tag == "sup" && e.has_class("reference"));
        let text = clean_text(&strip_citations(&block_text(&copy)));
        if text.is_empty() {
            return;
        }
        if !self.current.body.is_empty() {
            self.current.body.push_str("\n\n");
        }
        self.current.body.push_str(&text);
    }

    fn push(&mut self, section: Section) {
        if !section.body.is_empty() {
            self.done.push(section);
        }
    }

    fn finish(mut self) -> Vec<Section> {
        let last = std::mem::replace(&mut self.current, Section::new("", ""));
        self.push(last);
        self.done
    }
}

/// Text of a body block. Lists keep one item per line; paragraphs are
/// joined onto a single line.
fn block_text(block: &Element) -> String {
    if block.tag == "p" {
        return block.text_content().replace('\n', " ");
    }
    block.layout_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_heading_yields_single_section() {
        let html = "<p>Lead paragraph about her.</p><h2>References</h2><ol><li>Ref one</li></ol>";
        let sections = to_sections(html);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Introduction");
        assert_eq!(sections[0].body, "Lead paragraph about her.");
        assert!(sections
            .iter()
            .all(|s| !s.body.contains("Ref one") && s.heading != "References"));
    }

    #[test]
    fn headings_split_sections_in_order() {
        let html = r#"<div class="mw-parser-output">
<p>Intro one.</p>
<p>Intro two.<sup class="reference">[1]</sup></p>
<div class="mw-heading mw-heading2"><h2 id="Career">Career</h2><span class="mw-editsection">[edit]</span></div>
<p>Worked hard.[3]</p>
<ul><li>First job</li><li>Second job</li></ul>
<h2><span class="mw-headline">Legacy</span></h2>
<p>Remembered.</p>
</div>"#;
        let sections = to_sections(html);
        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Introduction", "Career", "Legacy"]);
        assert_eq!(sections[0].body, "Intro one.\n\nIntro two.");
        assert_eq!(sections[1].body, "Worked hard.\n\nFirst job\nSecond job");
        assert_eq!(sections[2].body, "Remembered.");
    }

    #[test]
    fn empty_sections_dropped_and_untitled_headings_named() {
        let html = "<h2>Empty</h2><h2> </h2><p>Body text.</p>";
        let sections = to_sections(html);
        assert_eq!(sections, vec![Section::new("Untitled", "Body text.")]);
    }

    #[test]
    fn nested_containers_are_walked() {
        let html = "<section><h2>Early life</h2><div><p>Grew up.</p></div></section>";
        let sections = to_sections(html);
        assert_eq!(sections, vec![Section::new("Early life", "Grew up.")]);
    }

    #[test]
    fn falls_back_to_content_section() {
        let sections = to_sections("Just some loose text without blocks.");
        assert_eq!(
            sections,
            vec![Section::new("Content", "Just some loose text without blocks.")]
        );
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(to_sections("").is_empty());
        assert!(to_sections("<style>p{}</style>").is_empty());
    }

    #[test]
    fn truncated_infobox_yields_no_sections() {
        assert!(to_sections(r#"<table class="infobox"><tr><td>Born 7 November 1867"#).is_empty());
        assert!(to_sections("<script>alert(1)").is_empty());
    }
}
