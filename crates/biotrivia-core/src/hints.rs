//! Progressive hint tiers.
//!
//! A hint is the base summary plus the first N sentences found in the
//! article sections. Every tier is a pure function of its inputs, so a
//! caller can rebuild any tier at any time from (summary, sections,
//! reveal count).

use std::collections::HashSet;

use crate::legacy::extract_legacy;
use crate::matcher::{base_name, fold_letters};
use crate::model::{HintTier, HintTiers, RawMarkup, Section};
use crate::sections::to_sections;

/// Placeholder substituted for words of the target's name.
pub const REDACTION: &str = "_____";

/// Shortest name word that gets redacted; shorter words ("de", "of") are
/// too common to hide.
const MIN_REDACTED_LEN: usize = 3;

/// Build all three hint tiers. No summary and no sections yields empty
/// tiers.
pub fn tier_hints(summary: &str, sections: &[Section]) -> HintTiers {
    HintTiers {
        minimal: tier_text(summary, sections, HintTier::Minimal),
        medium: tier_text(summary, sections, HintTier::Medium),
        full: tier_text(summary, sections, HintTier::Full),
    }
}

/// The hint unlocked after `reveal_count` reveals.
pub fn tier_for_reveal(summary: &str, sections: &[Section], reveal_count: u32) -> String {
    tier_text(summary, sections, HintTier::for_reveal_count(reveal_count))
}

fn tier_text(summary: &str, sections: &[Section], tier: HintTier) -> String {
    let summary = summary.trim();
    let sentences = first_sentences(sections, tier.sentence_count());
    let extra = if sentences.is_empty() {
        String::new()
    } else {
        format!("{}.", sentences.join(". "))
    };

    match (summary.is_empty(), extra.is_empty()) {
        (true, true) => String::new(),
        (false, true) => summary.to_string(),
        (true, false) => extra,
        (false, false) => format!("{summary}\n\n{extra}"),
    }
}

/// Walk sections in order collecting up to `count` sentences, each without
/// its terminating period.
pub fn first_sentences(sections: &[Section], count: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(count);
    if count == 0 {
        return out;
    }
    for section in sections {
        for sentence in split_sentences(&section.body) {
            out.push(sentence);
            if out.len() == count {
                return out;
            }
        }
    }
    out
}

/// Split on periods followed by whitespace or end of input. Fragments are
/// trimmed and empty ones dropped.
pub fn split_sentences(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = body.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c != '.' {
            continue;
        }
        let ends = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if ends {
            push_fragment(&mut out, &body[start..idx]);
            start = idx + 1;
        }
    }
    push_fragment(&mut out, &body[start..]);
    out
}

fn push_fragment(out: &mut Vec<String>, fragment: &str) {
    let collapsed = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
    if !collapsed.is_empty() {
        out.push(collapsed);
    }
}

/// Derive the summary and the sentence-source sections from raw markup.
///
/// Legacy wikitext is already a summary and has no sections. For rendered
/// HTML the first paragraph of the leading section is the summary and the
/// rest of the article feeds the extra sentences.
pub fn summary_and_sections(raw: &RawMarkup) -> (String, Vec<Section>) {
    match raw {
        RawMarkup::Legacy(wikitext) => (extract_legacy(wikitext), Vec::new()),
        RawMarkup::Structural(html) => {
            let mut sections = to_sections(html);
            if sections.is_empty() {
                return (String::new(), sections);
            }
            let lead = sections.remove(0);
            let (summary, rest) = match lead.body.split_once("\n\n") {
                Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
                None => (lead.body, String::new()),
            };
            if !rest.is_empty() {
                sections.insert(0, Section::new(lead.heading, rest));
            }
            (summary, sections)
        }
    }
}

/// Hint tiers for raw markup, with the target's name redacted.
pub fn hints_from_markup(raw: &RawMarkup, target: &str) -> HintTiers {
    let (summary, sections) = summary_and_sections(raw);
    let tiers = tier_hints(&summary, &sections);
    HintTiers {
        minimal: redact_target(&tiers.minimal, target),
        medium: redact_target(&tiers.medium, target),
        full: redact_target(&tiers.full, target),
    }
}

/// Replace each whole word matching a word of the target's base name
/// (case and accent insensitive, at least three letters) with
/// [`REDACTION`].
pub fn redact_target(text: &str, target: &str) -> String {
    let name_words: HashSet<String> = base_name(target)
        .split(|c: char| !c.is_alphanumeric())
        .map(fold_letters)
        .filter(|w| w.chars().count() >= MIN_REDACTED_LEN)
        .collect();
    if name_words.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;
    for (idx, c) in text.char_indices() {
        if c.is_alphanumeric() {
            word_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = word_start.take() {
            push_word(&mut out, &text[start..idx], &name_words);
        }
        out.push(c);
    }
    if let Some(start) = word_start {
        push_word(&mut out, &text[start..], &name_words);
    }
    out
}

fn push_word(out: &mut String, word: &str, name_words: &HashSet<String>) {
    if name_words.contains(&fold_letters(word)) {
        out.push_str(REDACTION);
    } else {
        out.push_str(word);
    }
}
