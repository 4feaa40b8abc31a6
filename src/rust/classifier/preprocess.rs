use lazy_static::lazy_static;
use regex::Regex;

/// Default character budget for preprocessed text.
pub const DEFAULT_MAX_LENGTH: usize = 3000;

lazy_static! {
    // Information separators U+001C..U+001F count as whitespace too.
    static ref WHITESPACE_RUN: Regex = Regex::new(r"[\s\x1c-\x1f]+").unwrap();
    // Anything that is not a letter, number, underscore, whitespace or
    // `. , ; : ! ? - ( ) '`. Combining marks are dropped, so decomposed
    // accents fold onto their base letter.
    static ref DISALLOWED: Regex = Regex::new(r"[^\p{L}\p{N}_\s\x1c-\x1f.,;:!?\-()']").unwrap();
}

/// Normalizes raw document text before scoring.
///
/// Whitespace runs collapse to a single space and the ends are trimmed, then
/// characters outside the safe set are removed. The result is cut to
/// `max_length` characters and lower-cased. Removing a symbol that sat
/// between two spaces leaves both spaces in place.
///
/// # Example
/// ```
/// use docsort::classifier::preprocess;
///
/// assert_eq!(preprocess("  Hello,\n\tWORLD™!  ", 3000), "hello, world!");
/// ```
pub fn preprocess(text: &str, max_length: usize) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let filtered = DISALLOWED.replace_all(collapsed.trim(), "");
    let truncated: String = filtered.chars().take(max_length).collect();
    truncated.to_lowercase()
}
