//! Substring-based lexical signals.
//!
//! Every phrase is matched as a literal substring of already-normalized
//! (lower-cased) text and counts at most once, however often it repeats.

use super::category::{Category, PerCategory};
use super::prototype::keywords_for;

/// Markers of creative or personal writing (poems, stories, diaries, letters).
pub const OTHER_INDICATORS: &[&str] = &[
    "poem", "poetry", "verse", "stanza", "rhyme",
    "story", "tale", "fiction", "novel", "chapter",
    "love", "heart", "soul", "dream", "moon", "stars",
    "song", "lyrics", "melody", "chorus",
    "once upon a time", "the end",
    "essay", "diary", "journal", "letter", "note",
];

/// Distinct indicators needed before text is treated as `Other`. Tunable.
pub const OTHER_INDICATOR_MATCHES: usize = 2;

fn count_present(text: &str, phrases: &[&str]) -> usize {
    phrases.iter().filter(|phrase| text.contains(*phrase)).count()
}

/// Number of distinct other-indicators present in `text`.
pub fn count_other_indicators(text: &str) -> usize {
    count_present(text, OTHER_INDICATORS)
}

/// True when `text` reads like creative or personal writing rather than a
/// formal document.
pub fn looks_like_other(text: &str) -> bool {
    count_other_indicators(text) >= OTHER_INDICATOR_MATCHES
}

/// Number of distinct strong keywords of `category` present in `text`.
pub fn count_keywords(text: &str, category: Category) -> usize {
    count_present(text, keywords_for(category))
}

/// Keyword counts for every formal category.
pub fn keyword_counts(text: &str) -> PerCategory<usize> {
    PerCategory::from_fn(|category| count_keywords(text, category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_indicators_need_two_distinct_terms() {
        assert!(!looks_like_other("a poem"));
        assert!(!looks_like_other("poem poem poem"));
        assert!(looks_like_other("a poem about the moon"));
        assert!(looks_like_other("dear diary, today i wrote a letter"));
    }

    #[test]
    fn test_indicator_matching_is_substring_based() {
        // "stale" contains "tale", "notes" contains "note"
        assert_eq!(count_other_indicators("stale notes"), 2);
    }

    #[test]
    fn test_count_keywords_counts_each_phrase_once() {
        assert_eq!(count_keywords("contract contract contract", Category::LegalDocument), 1);
        assert_eq!(
            count_keywords("agreement contract parties hereby terms conditions legal binding court", Category::LegalDocument),
            9
        );
    }

    #[test]
    fn test_multi_word_phrases() {
        let text = "professional summary and work experience";
        assert_eq!(count_keywords(text, Category::Resume), 2);
        assert_eq!(count_keywords("work and experience", Category::Resume), 0);
    }

    #[test]
    fn test_other_has_no_keywords() {
        assert_eq!(count_keywords("resume report contract", Category::Other), 0);
    }

    #[test]
    fn test_keyword_counts_table() {
        let counts = keyword_counts("quarterly report with data analysis and a contract");
        assert_eq!(counts.resume, 0);
        assert_eq!(counts.report, 4);
        assert_eq!(counts.legal_document, 1);
    }
}
