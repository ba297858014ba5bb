//! Legacy wikitext extraction.
//!
//! Converts the template-laden wikitext of an article's lead section into
//! plain prose. Templates are removed with an explicit depth-counting
//! scanner so arbitrarily nested `{{...}}` spans disappear as a unit.

use crate::normalize::{clean_text, decode_entities, strip_tags};

/// Templates whose leading positional parameters are a `Y|M|D` date.
const DATE_TEMPLATES: &[&str] = &[
    "birth date",
    "birth date and age",
    "death date",
    "death date and age",
    "start date",
    "end date",
    "date",
];

/// Link namespaces whose targets are media or metadata, not prose.
const DROPPED_LINK_PREFIXES: &[&str] = &["file:", "image:", "category:"];

/// Extract prose from lead-section wikitext.
///
/// Keeps paragraphs 1 through 3 (the leading paragraph is the infobox and
/// hatnote block), then strips markup in a fixed order.
pub fn extract_legacy(wikitext: &str) -> String {
    let unified = wikitext.replace("\r\n", "\n");
    let kept = paragraphs(&unified)
        .into_iter()
        .skip(1)
        .take(3)
        .collect::<Vec<_>>()
        .join("\n\n");

    let text = substitute_date_templates(&kept);
    let text = strip_templates(&text);
    let text = strip_comments(&text);
    let text = strip_refs(&text);
    let text = strip_tags(&text);
    let text = strip_emphasis(&text);
    let text = strip_heading_markers(&text);
    let text = resolve_links(&text);
    let text = decode_entities(&text);
    let text = clean_born_artifact(&text);
    clean_text(&text)
}

/// Split on blank lines; each paragraph keeps its internal line breaks.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n"));
    }
    out
}

/// Replace innermost date templates such as `{{birth date|1867|11|7}}` with
/// `1867/11/7`. Named parameters (`df=y`) are ignored.
pub fn substitute_date_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let inner = &after[..close];
        match (!inner.contains("{{")).then(|| date_from_template(inner)).flatten() {
            Some(date) => {
                out.push_str(&date);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn date_from_template(inner: &str) -> Option<String> {
    let mut parts = inner.split('|');
    let name = parts.next()?.trim().replace('_', " ").to_lowercase();
    if !DATE_TEMPLATES.contains(&name.as_str()) {
        return None;
    }
    let positional: Vec<&str> = parts
        .map(str::trim)
        .filter(|p| !p.contains('=') && !p.is_empty())
        .take(3)
        .collect();
    if positional.is_empty() {
        return None;
    }
    Some(positional.join("/"))
}

/// Remove every `{{...}}` span, nested spans included. Text is emitted only
/// while the depth counter is zero; a stray `}}` at depth zero is kept.
pub fn strip_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{{") {
            depth += 1;
            rest = &rest[2..];
        } else if depth > 0 && rest.starts_with("}}") {
            depth -= 1;
            rest = &rest[2..];
        } else {
            if depth == 0 {
                out.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("<!--") {
        out.push_str(&rest[..open]);
        match rest[open..].find("-->") {
            Some(close) => rest = &rest[open + close + 3..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Remove `<ref>...</ref>` pairs and self-closing `<ref ... />` tags.
pub fn strip_refs(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(rel) = lower[pos..].find("<ref") {
        let open = pos + rel;
        let boundary = lower[open + 4..].chars().next();
        if !matches!(boundary, Some('>' | '/') | Some(' ' | '\t' | '\n')) {
            out.push_str(&text[pos..open + 4]);
            pos = open + 4;
            continue;
        }
        out.push_str(&text[pos..open]);
        let Some(tag_end) = lower[open..].find('>').map(|i| open + i) else {
            return out;
        };
        if lower[..tag_end].ends_with('/') {
            pos = tag_end + 1;
            continue;
        }
        pos = match lower[tag_end..].find("</ref>") {
            Some(close) => tag_end + close + "</ref>".len(),
            None => tag_end + 1,
        };
    }
    out.push_str(&text[pos..]);
    out
}

/// Remove runs of two or more apostrophes (wiki bold/italic markers).
fn strip_emphasis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == '\'' {
            run += 1;
            continue;
        }
        if run == 1 {
            out.push('\'');
        }
        run = 0;
        out.push(c);
    }
    if run == 1 {
        out.push('\'');
    }
    out
}

fn strip_heading_markers(text: &str) -> String {
    text.split('\n')
        .filter(|line| {
            let t = line.trim();
            !(t.len() >= 4 && t.starts_with("==") && t.ends_with("=="))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve `[[Page|Display]]` to `Display` and `[[Page]]` to `Page`; drop
/// file and category links; reduce `[http://url label]` to `label`.
pub fn resolve_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let next_internal = rest.find("[[");
        let next_external = rest.find("[http");
        match (next_internal, next_external) {
            (Some(i), e) if e.map_or(true, |e| i <= e) => {
                out.push_str(&rest[..i]);
                let after = &rest[i + 2..];
                let Some(close) = matching_link_close(after) else {
                    out.push_str(&rest[i..]);
                    return out;
                };
                let inner = &after[..close];
                let lower = inner.trim_start().to_lowercase();
                if !DROPPED_LINK_PREFIXES.iter().any(|p| lower.starts_with(p)) {
                    let display = inner.split_once('|').map_or(inner, |(_, d)| d);
                    out.push_str(display);
                }
                rest = &after[close + 2..];
            }
            (_, Some(e)) => {
                out.push_str(&rest[..e]);
                let after = &rest[e + 1..];
                match after.find(']') {
                    Some(close) => {
                        if let Some((_, label)) = after[..close].split_once(' ') {
                            out.push_str(label.trim());
                        }
                        rest = &after[close + 1..];
                    }
                    None => {
                        out.push_str(&rest[e..]);
                        return out;
                    }
                }
            }
            _ => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Byte offset of the `]]` closing a link whose `[[` has been consumed.
fn matching_link_close(after: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut i = 0;
    let bytes = after.as_bytes();
    while i + 1 < bytes.len() {
        if bytes[i] == b'[' && bytes[i + 1] == b'[' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b']' && bytes[i + 1] == b']' {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}

/// Tidy the `(; born ...)` residue left when pronunciation templates are
/// removed from the opening parenthetical.
pub fn clean_born_artifact(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open + 1]);
        let after = &rest[open + 1..];
        let trimmed = after.trim_start_matches(|c: char| c == ';' || c == ',' || c.is_whitespace());
        if let Some(after_close) = trimmed.strip_prefix(')') {
            // the parenthetical was nothing but residue
            out.pop();
            while out.ends_with(' ') {
                out.pop();
            }
            rest = after_close;
        } else {
            rest = trimmed;
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_counted_template_removal() {
        assert_eq!(strip_templates("A {{x {{y}} z}} B"), "A  B");
        assert_eq!(strip_templates("{{a|{{b|{{c}}}}}}tail"), "tail");
        assert_eq!(strip_templates("no templates}} here"), "no templates}} here");
        assert_eq!(strip_templates("open {{ never closed"), "open ");
    }

    #[test]
    fn date_templates_become_literal_dates() {
        assert_eq!(
            substitute_date_templates("born {{birth date|1867|11|7}} in Warsaw"),
            "born 1867/11/7 in Warsaw"
        );
        assert_eq!(
            substitute_date_templates("{{Death date and age|df=y|1934|7|4|1867|11|7}}"),
            "1934/7/4"
        );
        assert_eq!(
            substitute_date_templates("{{lang|fr|{{date|1900|1|1}}}}"),
            "{{lang|fr|1900/1/1}}"
        );
        assert_eq!(substitute_date_templates("{{cite web|x}}"), "{{cite web|x}}");
    }

    #[test]
    fn refs_removed_paired_and_self_closing() {
        assert_eq!(
            strip_refs("A<ref name=\"x\">{{cite}}</ref> B<ref name=y /> C<REF>z</REF>."),
            "A B C."
        );
        assert_eq!(strip_refs("<reference>kept"), "<reference>kept");
    }

    #[test]
    fn links_resolve_to_display_text() {
        assert_eq!(
            resolve_links("[[Physics|physicist]] and [[chemist]]"),
            "physicist and chemist"
        );
        assert_eq!(
            resolve_links("[[File:Curie.jpg|thumb|A [[portrait]]]]Text"),
            "Text"
        );
        assert_eq!(
            resolve_links("see [http://example.org the site] now"),
            "see the site now"
        );
    }

    #[test]
    fn emphasis_runs_removed_single_apostrophe_kept() {
        assert_eq!(strip_emphasis("'''Marie''' was ''great'', wasn't she"), "Marie was great, wasn't she");
    }

    #[test]
    fn born_artifact_cleaned() {
        assert_eq!(
            clean_born_artifact("Marie Curie (; born Maria; 1867)"),
            "Marie Curie (born Maria; 1867)"
        );
        assert_eq!(clean_born_artifact("Name ( ; ) was"), "Name was");
    }

    #[test]
    fn full_lead_section() {
        let wikitext = "{{Short description|Physicist}}\n{{Infobox scientist\n| name = Marie Curie\n}}\n\n'''Marie Salomea Skłodowska–Curie''' ({{IPAc-en|k|j|ʊər|i}}; born '''Maria Salomea Skłodowska'''; {{birth date|1867|11|7}} – {{death date|1934|7|4}}) was a [[Poland|Polish]] and naturalised-French [[physicist]] and [[chemist]].<ref>{{cite book|title=X}}</ref>\n\nShe was the first woman to win a [[Nobel Prize]].<ref name=\"nobel\" />\n\n==Life==\nHer father taught &quot;mathematics&quot;.\n\nFifth paragraph is dropped.";
        let text = extract_legacy(wikitext);
        assert!(text.starts_with(
            "Marie Salomea Skłodowska–Curie (born Maria Salomea Skłodowska; 1867/11/7 – 1934/7/4) was a Polish and naturalised-French physicist and chemist."
        ));
        assert!(text.contains("She was the first woman to win a Nobel Prize."));
        assert!(text.contains("Her father taught \"mathematics\"."));
        assert!(!text.contains("Life"));
        assert!(!text.contains("Fifth"));
        assert!(!text.contains("Infobox"));
    }

    #[test]
    fn short_input_yields_empty() {
        assert_eq!(extract_legacy("{{Infobox person}}"), "");
        assert_eq!(extract_legacy(""), "");
    }
}
