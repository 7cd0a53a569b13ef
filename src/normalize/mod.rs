//! Metadata capitalization normalizer.
//!
//! Pure text transformation, no I/O. Re-capitalizes free text to title case
//! while preserving what deliberate taggers wrote:
//!
//! - minor words ("of", "the", ...) stay lowercase unless they lead,
//! - all-caps tokens survive (MFDOOM stays MFDOOM),
//! - Roman numerals survive ("your gold teeth II" -> "Your Gold Teeth II"),
//! - hyphen/slash compounds are normalized per segment ("jay-z" -> "Jay-Z"),
//! - bracket-delimited sub-strings are normalized independently, so the word
//!   after "(" counts as leading.

use std::collections::HashSet;

/// Minor words kept lowercase when they are not the leading word.
pub const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "in", "nor", "of", "on", "or", "the", "up",
];

/// The default exception set as an owned `HashSet`, for callers that extend
/// it from configuration.
pub fn default_exceptions() -> HashSet<String> {
    MINOR_WORDS.iter().map(|w| w.to_string()).collect()
}

const ROMAN_NUMERALS: &[&str] = &[
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX", "XX", "XXX", "XL", "L", "LX", "LXX", "LXXX", "XC", "C", "CC",
    "CCC", "CD", "D", "DC", "DCC", "DCCC", "CM", "M", "MM", "MMM",
];

/// Check if a word is a Roman numeral (in any letter case).
fn is_roman_numeral(word: &str) -> bool {
    !word.is_empty() && ROMAN_NUMERALS.contains(&word.to_uppercase().as_str())
}

/// Python-style `isupper`: at least one cased character, and every cased
/// character is uppercase. Digits and punctuation are ignored.
fn is_all_upper(word: &str) -> bool {
    let mut has_cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Uppercase the first character, lowercase the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.extend(chars.flat_map(|c| c.to_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// Normalize one word. `exception_eligible` is false for the leading word of
/// a segment, which is always capitalized even if it is a minor word.
fn normalize_word(word: &str, exceptions: &HashSet<String>, exception_eligible: bool) -> String {
    // Hyphen/slash compounds: normalize each sub-word, one separator at a
    // time, so "ac/dc-live" handles both joins.
    if word.contains('-') || word.contains('/') {
        let mut current = word.to_string();
        for sep in ['-', '/'] {
            if !current.contains(sep) {
                continue;
            }
            let parts: Vec<String> = current
                .split(sep)
                .enumerate()
                .map(|(j, sub)| {
                    if j != 0 && exceptions.contains(&sub.to_lowercase()) {
                        sub.to_lowercase()
                    } else if is_all_upper(sub) || is_roman_numeral(sub) {
                        sub.to_string()
                    } else {
                        capitalize(sub)
                    }
                })
                .collect();
            current = parts.join(&sep.to_string());
        }
        return current;
    }

    let lower = word.to_lowercase();
    if exception_eligible && exceptions.contains(&lower) {
        return lower;
    }
    if is_all_upper(word) || is_roman_numeral(word) {
        return word.to_string();
    }
    capitalize(word)
}

/// Normalize a plain (bracket-free) segment, preserving whitespace runs.
fn normalize_segment(text: &str, exceptions: &HashSet<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut token_index = 0usize;
    let mut rest = text;

    while !rest.is_empty() {
        let is_ws = rest.chars().next().is_some_and(char::is_whitespace);
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != is_ws)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);

        if is_ws {
            out.push_str(token);
        } else {
            out.push_str(&normalize_word(token, exceptions, token_index != 0));
        }

        token_index += 1;
        rest = tail;
    }

    out
}

/// Normalize the capitalization of free text.
///
/// Bracketed sub-strings (`()`, `[]`, `{}`) are normalized independently of
/// the surrounding text, then re-wrapped in their original brackets.
pub fn normalize_capitalization(text: &str, exceptions: &HashSet<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        // Shortest bracketed span starting at the first opener with a closer.
        let span = rest.char_indices().find_map(|(i, c)| {
            let closer = match c {
                '(' => ')',
                '[' => ']',
                '{' => '}',
                _ => return None,
            };
            rest[i + 1..].find(closer).map(|j| (i, i + 1 + j, closer))
        });

        match span {
            Some((open, close, closer)) => {
                out.push_str(&normalize_segment(&rest[..open], exceptions));
                out.push(rest[open..].chars().next().unwrap_or('('));
                out.push_str(&normalize_segment(&rest[open + 1..close], exceptions));
                out.push(closer);
                rest = &rest[close + closer.len_utf8()..];
            }
            None => {
                out.push_str(&normalize_segment(rest, exceptions));
                break;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn exceptions() -> HashSet<String> {
        default_exceptions()
    }

    #[test]
    fn test_title_case_with_minor_words() {
        assert_eq!(
            normalize_capitalization("simon and garfunkel", &exceptions()),
            "Simon and Garfunkel"
        );
        assert_eq!(
            normalize_capitalization("dark side of the moon", &exceptions()),
            "Dark Side of the Moon"
        );
    }

    #[test]
    fn test_leading_minor_word_is_capitalized() {
        assert_eq!(
            normalize_capitalization("the wall", &exceptions()),
            "The Wall"
        );
    }

    #[test]
    fn test_all_caps_preserved() {
        assert_eq!(normalize_capitalization("MFDOOM", &exceptions()), "MFDOOM");
        assert_eq!(
            normalize_capitalization("live at the BBC", &exceptions()),
            "Live at the BBC"
        );
    }

    #[test]
    fn test_roman_numerals_preserved() {
        assert_eq!(
            normalize_capitalization("your gold teeth II", &exceptions()),
            "Your Gold Teeth II"
        );
        // Lowercase numerals are preserved as written, not upcased.
        assert_eq!(
            normalize_capitalization("chapter iv", &exceptions()),
            "Chapter iv"
        );
    }

    #[test]
    fn test_hyphen_and_slash_compounds() {
        assert_eq!(normalize_capitalization("jay-z", &exceptions()), "Jay-Z");
        assert_eq!(normalize_capitalization("AC/DC", &exceptions()), "AC/DC");
        assert_eq!(
            normalize_capitalization("singer-of-songs", &exceptions()),
            "Singer-of-Songs"
        );
    }

    #[test]
    fn test_bracketed_substring_normalized_independently() {
        // "of" leads the bracketed segment, so it is capitalized there.
        assert_eq!(
            normalize_capitalization("best songs (of the year)", &exceptions()),
            "Best Songs (Of the Year)"
        );
        assert_eq!(
            normalize_capitalization("album [deluxe edition]", &exceptions()),
            "Album [Deluxe Edition]"
        );
    }

    #[test]
    fn test_unclosed_bracket_treated_as_plain_text() {
        assert_eq!(
            normalize_capitalization("broken (tag", &exceptions()),
            "Broken (tag"
        );
    }

    #[test]
    fn test_whitespace_runs_preserved() {
        assert_eq!(
            normalize_capitalization("two  spaces", &exceptions()),
            "Two  Spaces"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_capitalization("", &exceptions()), "");
    }

    proptest! {
        // Normalization is a projection: applying it twice changes nothing.
        #[test]
        fn prop_normalize_is_idempotent(text in "[ -~]{0,48}") {
            let ex = exceptions();
            let once = normalize_capitalization(&text, &ex);
            let twice = normalize_capitalization(&once, &ex);
            prop_assert_eq!(once, twice);
        }

        // Length in characters is stable for bracket-free ASCII input.
        #[test]
        fn prop_word_count_stable(text in "[a-zA-Z ]{0,48}") {
            let ex = exceptions();
            let normalized = normalize_capitalization(&text, &ex);
            prop_assert_eq!(
                text.split_whitespace().count(),
                normalized.split_whitespace().count()
            );
        }
    }
}
