//! Fuzzy guess matching.
//!
//! Guess and target are folded to lowercase letters with diacritics removed,
//! then compared as letter multisets. A guess is accepted when at most one
//! letter the target needs is missing from it.

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Largest number of missing target letters a guess may have.
pub const MAX_DEFICIT: u32 = 1;

/// Target name with every parenthetical disambiguation removed, e.g.
/// `"John Smith (explorer)"` becomes `"John Smith"`.
pub fn base_name(target: &str) -> String {
    let mut out = String::with_capacity(target.len());
    let mut depth = 0usize;
    for c in target.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical letter-only form: lowercase, canonical decomposition,
/// combining marks dropped, non-letters dropped.
pub fn fold_letters(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c) && c.is_alphabetic())
        .collect()
}

/// Key identifying a target regardless of case, accents and
/// disambiguation. Used to track which names a run has already asked.
pub fn target_key(target: &str) -> String {
    fold_letters(&base_name(target))
}

/// Number of target letter instances the guess does not supply, or `None`
/// when either side folds to nothing.
pub fn letter_deficit(guess: &str, target: &str) -> Option<u32> {
    let wanted = target_key(target);
    let offered = fold_letters(guess);
    if wanted.is_empty() || offered.is_empty() {
        return None;
    }

    let mut have: HashMap<char, u32> = HashMap::new();
    for c in offered.chars() {
        *have.entry(c).or_default() += 1;
    }
    let mut need: HashMap<char, u32> = HashMap::new();
    for c in wanted.chars() {
        *need.entry(c).or_default() += 1;
    }

    Some(
        need.iter()
            .map(|(c, n)| n.saturating_sub(have.get(c).copied().unwrap_or(0)))
            .sum(),
    )
}

/// Decide whether `guess` names `target`.
///
/// Letter order is ignored and extra letters in the guess are never
/// penalized; the guess is rejected once more than [`MAX_DEFICIT`] target
/// letters are missing. Empty input on either side is rejected.
pub fn evaluate_guess(guess: &str, target: &str) -> bool {
    match letter_deficit(guess, target) {
        Some(deficit) => deficit <= MAX_DEFICIT,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_case_insensitive_match() {
        assert!(evaluate_guess("Marie Curie", "Marie Curie"));
        assert!(evaluate_guess("marie curie", "Marie Curie"));
        assert!(evaluate_guess("MARIECURIE", "Marie Curie"));
    }

    #[test]
    fn letter_order_is_ignored() {
        assert!(evaluate_guess("Curie Marie", "Marie Curie"));
        assert!(evaluate_guess("eiruc eiram", "Marie Curie"));
    }

    #[test]
    fn one_missing_letter_accepted_two_rejected() {
        assert_eq!(letter_deficit("Mari Curie", "Marie Curie"), Some(1));
        assert!(evaluate_guess("Mari Curie", "Marie Curie"));
        assert!(evaluate_guess("Marie Curi", "Marie Curie"));
        // lacks an 'i' and an 'e'; the extra 'y' earns nothing back
        assert_eq!(letter_deficit("Mary Curie", "Marie Curie"), Some(2));
        assert!(!evaluate_guess("Mary Curie", "Marie Curie"));
        assert!(!evaluate_guess("Mar Curie", "Marie Curie"));
        assert!(!evaluate_guess("Curie", "Marie Curie"));
    }

    #[test]
    fn repeated_letters_counted_per_instance() {
        assert!(evaluate_guess("Ana", "Anna"));
        assert!(!evaluate_guess("An", "Anna"));
    }

    #[test]
    fn diacritics_and_punctuation_folded() {
        assert!(evaluate_guess("Frederic Chopin", "Frédéric Chopin"));
        assert!(evaluate_guess("Antonín Dvořák", "Antonin Dvorak"));
        assert!(evaluate_guess("Martin Luther King Jr", "Martin Luther King Jr."));
        assert!(evaluate_guess("O'Keeffe Georgia", "Georgia O'Keeffe"));
    }

    #[test]
    fn parenthetical_disambiguation_ignored() {
        assert_eq!(base_name("John Smith (explorer)"), "John Smith");
        assert_eq!(base_name("Prince (musician) (1958)"), "Prince");
        assert!(evaluate_guess("John Smith", "John Smith (explorer)"));
        assert_eq!(target_key("Frédéric Chopin (composer)"), "fredericchopin");
    }

    #[test]
    fn empty_inputs_rejected() {
        assert!(!evaluate_guess("", "Marie Curie"));
        assert!(!evaluate_guess("   ", "Marie Curie"));
        assert!(!evaluate_guess("123 !!", "Marie Curie"));
        assert!(!evaluate_guess("Marie Curie", ""));
        assert!(!evaluate_guess("Marie Curie", "(disambiguation)"));
    }

    #[test]
    fn extraneous_letters_are_not_penalized() {
        assert!(evaluate_guess("xx Marie zz Curie qq", "Marie Curie"));
    }
}
