//! Markup-to-plain-text normalization.
//!
//! Structural (rendered HTML) input goes through [`extract_structural`];
//! legacy wikitext goes through [`crate::legacy::extract_legacy`]. Both end
//! in the same cleaned-text contract: no tags, no citation markers, no runs
//! of horizontal whitespace, at most one blank line between paragraphs.

use crate::dom::{parse_fragment, Element};
use crate::legacy::extract_legacy;
use crate::model::RawMarkup;

/// Headings that start non-biographical back matter.
pub const STOP_HEADINGS: &[&str] = &[
    "references",
    "see also",
    "external links",
    "further reading",
    "notes",
    "bibliography",
];

/// Classes of elements that never carry article prose.
const DENY_CLASSES: &[&str] = &[
    "infobox",
    "navbox",
    "vertical-navbox",
    "sidebar",
    "toc",
    "mw-editsection",
    "reference",
    "references",
    "reflist",
    "mw-references-wrap",
    "mw-cite-backlink",
    "thumb",
    "tmulti",
    "gallery",
    "mw-gallery-traditional",
    "metadata",
    "ambox",
    "mbox-small",
    "hatnote",
    "shortdescription",
    "noprint",
];

const DENY_TAGS: &[&str] = &["style", "script", "noscript", "link", "meta", "figure"];

/// Blocks dropped whole by the naive fallback. Tables are nearly always
/// infoboxes or navboxes.
const NAIVE_DROP_BLOCKS: &[&str] = &["style", "script", "noscript", "table"];

/// Bracketed notes that are stripped like numeric citation markers.
const CITATION_PHRASES: &[&str] = &[
    "citation needed",
    "clarification needed",
    "better source needed",
    "full citation needed",
    "page needed",
    "verification needed",
    "dubious",
    "according to whom?",
    "who?",
    "when?",
    "which?",
    "edit",
];

/// Normalize raw markup of either dialect to plain text.
pub fn normalize_markup(raw: &RawMarkup) -> String {
    match raw {
        RawMarkup::Structural(html) => extract_structural(html),
        RawMarkup::Legacy(wikitext) => extract_legacy(wikitext),
    }
}

/// Extract readable article text from a rendered HTML fragment.
///
/// An empty result is a valid outcome, e.g. for a fragment holding only an
/// infobox. The naive fallback only runs when the parser produced no tree
/// at all for input that has visible text.
pub fn extract_structural(html: &str) -> String {
    match structured_text(html) {
        Some(text) => text,
        None => {
            tracing::debug!("structured extraction failed, stripping tags naively");
            fallback_text(html)
        }
    }
}

fn structured_text(html: &str) -> Option<String> {
    let parsed = parse_fragment(html);
    if parsed.root.children.is_empty() && has_visible_text(html) {
        tracing::debug!(errors = parsed.error_count, "parser produced an empty tree");
        return None;
    }
    let tree = prepare_tree(parsed.root);
    Some(truncate_at_stop_heading(&clean_text(&strip_citations(
        &tree.layout_text(),
    ))))
}

/// Naive tag stripping, then the trimmed input if it carries no markup.
fn fallback_text(html: &str) -> String {
    let stripped = naive_text(html);
    if !stripped.is_empty() {
        return stripped;
    }
    let raw = html.trim();
    if raw.contains('<') {
        String::new()
    } else {
        raw.to_string()
    }
}

fn naive_text(html: &str) -> String {
    let without_blocks = NAIVE_DROP_BLOCKS
        .iter()
        .fold(html.to_string(), |acc, tag| strip_tag_blocks(&acc, tag));
    truncate_at_stop_heading(&clean_text(&strip_citations(&decode_entities(
        &strip_tags(&without_blocks),
    ))))
}

/// Parse `html` and return its cleaned content subtree: primary content
/// container selected, denylisted elements removed, back matter cut.
pub fn prepared_tree(html: &str) -> Element {
    prepare_tree(parse_fragment(html).root)
}

fn prepare_tree(root: Element) -> Element {
    let mut content = select_content_root(root);
    content.remove_where(&is_denied);
    if content.truncate_from(&is_stop_heading) {
        tracing::debug!("removed back matter after stop heading");
    }
    content
}

fn select_content_root(root: Element) -> Element {
    let candidates: [&dyn Fn(&Element) -> bool; 4] = [
        &|e| e.has_class("mw-parser-output"),
        &|e| e.id.as_deref() == Some("mw-content-text"),
        &|e| e.tag == "main",
        &|e| e.tag == "article",
    ];
    for pred in candidates {
        if let Some(found) = root.find(pred) {
            return found.clone();
        }
    }
    root
}

fn is_denied(el: &Element) -> bool {
    DENY_TAGS.contains(&el.tag.as_str())
        || el.id.as_deref() == Some("toc")
        || el.classes.iter().any(|c| DENY_CLASSES.contains(&c.as_str()))
}

fn is_stop_heading(el: &Element) -> bool {
    el.is_heading() && is_stop_title(&heading_title(el))
}

/// Case-insensitive exact match against [`STOP_HEADINGS`].
pub fn is_stop_title(title: &str) -> bool {
    let lower = title.trim().to_lowercase();
    STOP_HEADINGS.contains(&lower.as_str())
}

/// Display title of a heading element: its label sub-element when present,
/// otherwise its whole text, with a trailing edit marker removed.
pub fn heading_title(el: &Element) -> String {
    let label = el
        .child_elements()
        .find_map(|c| c.find(&|e| e.has_class("mw-headline")))
        .or_else(|| {
            if el.is_heading_tag() {
                None
            } else {
                el.child_elements().find_map(|c| c.find(&Element::is_heading_tag))
            }
        });
    let raw = match label {
        Some(label) => label.text_content(),
        None => el.text_content(),
    };
    let collapsed = collapse_horizontal(&raw);
    let trimmed = collapsed.trim();
    trimmed
        .strip_suffix("[edit]")
        .unwrap_or(trimmed)
        .trim_end()
        .to_string()
}

/// Cut plain text at the first line that is exactly a stop heading.
pub fn truncate_at_stop_heading(text: &str) -> String {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if is_stop_title(line) {
            return text[..offset].trim_end().to_string();
        }
        offset += line.len();
    }
    text.to_string()
}

/// Remove bracketed citation markers such as `[12]`, `[a]`, `[note 3]` and
/// `[citation needed]`.
pub fn strip_citations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if is_citation_marker(&after[..close]) => {
                rest = &after[close + 1..];
            }
            _ => {
                out.push('[');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_citation_marker(inner: &str) -> bool {
    let inner = inner.trim();
    if inner.is_empty() || inner.len() > 40 || inner.contains(['[', '\n']) {
        return false;
    }
    if inner.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    // footnote letters: [a] .. [zz]
    if inner.len() <= 2 && inner.chars().all(|c| c.is_ascii_lowercase()) {
        return true;
    }
    let lower = inner.to_lowercase();
    if let Some(num) = lower
        .strip_prefix("note ")
        .or_else(|| lower.strip_prefix("nb "))
    {
        return !num.is_empty() && num.chars().all(|c| c.is_ascii_alphanumeric());
    }
    CITATION_PHRASES
        .iter()
        .any(|phrase| lower == *phrase || lower.starts_with(&format!("{phrase} ")))
}

/// Apply the shared whitespace contract: unify line endings, collapse runs
/// of horizontal whitespace, trim each line, allow at most one blank line
/// in a row, trim the whole.
pub fn clean_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0usize;
    for line in unified.split('\n') {
        let line = collapse_horizontal(line);
        let line = line.trim();
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run > 0 { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = 0;
    }
    out
}

/// Collapse every run of non-newline whitespace to a single space.
pub fn collapse_horizontal(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_space = false;
    for c in line.chars() {
        if c.is_whitespace() && c != '\n' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Drop everything between `<` and the next `>`.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Remove `<tag ...>...</tag>` blocks, contents included (ASCII
/// case-insensitive). An unclosed block runs to the end of the input.
fn strip_tag_blocks(html: &str, tag: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}>");
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(rel) = lower[pos..].find(&open_pat) {
        let open = pos + rel;
        out.push_str(&html[pos..open]);
        match lower[open..].find(&close_pat) {
            Some(close) => pos = open + close + close_pat.len(),
            None => return out,
        }
    }
    out.push_str(&html[pos..]);
    out
}

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
];

/// Decode the fixed entity set. `&amp;` is decoded last so that `&amp;lt;`
/// stays a literal `&lt;`.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

fn has_visible_text(html: &str) -> bool {
    strip_tags(html).chars().any(|c| !c.is_whitespace())
}
