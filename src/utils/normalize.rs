//! Text normalization shared by catalog loading and query parsing
//!
//! Every catalog field is run through these functions once at load time, and
//! every user utterance is run through them before comparison, so matching
//! always happens in the same token space.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Anything that is neither a word character nor whitespace
    static ref NON_WORD_PATTERN: Regex = Regex::new(r"[^\w\s]").unwrap();

    // Parenthesized asides such as "(Original Motion Picture Soundtrack)"
    static ref PAREN_PATTERN: Regex = Regex::new(r"\(.*?\)").unwrap();

    // An ASCII letter immediately followed by a digit, e.g. "dhoom2"
    static ref LETTER_DIGIT_PATTERN: Regex = Regex::new(r"([a-zA-Z])(\d)").unwrap();
}

/// Canonicalize free text: NFKC, punctuation removed, trimmed, lower-cased.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    let lowered = NON_WORD_PATTERN.replace_all(&composed, "").to_lowercase();

    // lower-casing and punctuation removal can both expose new compositions
    let recomposed: String = lowered.nfkc().collect();
    NON_WORD_PATTERN
        .replace_all(&recomposed, "")
        .trim()
        .to_string()
}

/// Canonicalize an album or movie title.
///
/// Drops parenthesized text, normalizes like [`normalize_text`] and separates
/// letters from trailing digits ("dhoom2" -> "dhoom 2").
pub fn normalize_album(album: &str) -> String {
    let without_parens = PAREN_PATTERN.replace_all(album, "");
    split_letter_digit(&normalize_text(&without_parens))
}

/// Insert a space between an ASCII letter and the digit that follows it.
pub fn split_letter_digit(text: &str) -> String {
    LETTER_DIGIT_PATTERN.replace_all(text, "$1 $2").to_string()
}
