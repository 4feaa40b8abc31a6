//! Mapping from raw evidence to the user-facing confidence value.
//!
//! All thresholds here are empirically tuned parameters, not hard limits.

/// Lower edge of the working range of raw cosine similarities.
pub const SIMILARITY_RANGE_LOW: f64 = 0.10;
/// Upper edge of the working range of raw cosine similarities.
pub const SIMILARITY_RANGE_HIGH: f64 = 0.45;
/// Bonus per matched keyword of the final category.
pub const KEYWORD_BONUS_STEP: f64 = 0.025;
/// Ceiling on the keyword bonus.
pub const KEYWORD_BONUS_CAP: f64 = 0.10;
/// Lowest confidence the normalizer reports.
pub const CONFIDENCE_FLOOR: f64 = 0.70;
/// Width of the reported band; the normalizer never exceeds floor + span (0.95).
pub const CONFIDENCE_SPAN: f64 = 0.25;

// Keyword-only classifier
const MATCH_BONUS_STEP: f64 = 0.03;
const MATCH_BONUS_CAP: f64 = 0.25;
const DOMINANCE_WEIGHT: f64 = 0.05;
const KEYWORD_CONFIDENCE_CAP: f64 = 0.95;

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Maps a raw similarity and the final category's keyword count into
/// `[0.70, 0.95]`.
///
/// # Example
/// ```
/// use docsort::classifier::normalize_confidence;
///
/// assert_eq!(normalize_confidence(0.10, 0), 0.70);
/// assert_eq!(normalize_confidence(0.45, 0), 0.95);
/// assert_eq!(normalize_confidence(0.10, 4), 0.725);
/// ```
pub fn normalize_confidence(raw_similarity: f64, keyword_count: usize) -> f64 {
    let rescaled = ((raw_similarity - SIMILARITY_RANGE_LOW)
        / (SIMILARITY_RANGE_HIGH - SIMILARITY_RANGE_LOW))
        .clamp(0.0, 1.0);
    // NaN compares false everywhere; treat it as no semantic signal.
    let rescaled = if rescaled.is_nan() { 0.0 } else { rescaled };
    let bonus = (keyword_count as f64 * KEYWORD_BONUS_STEP).min(KEYWORD_BONUS_CAP);
    let normalized = (rescaled + bonus).min(1.0);
    round3(CONFIDENCE_FLOOR + normalized * CONFIDENCE_SPAN)
}

/// Confidence used by the keyword-only classifier: a 0.70 base, up to 0.25
/// for the winning category's matches, and up to 0.05 for its share of all
/// matches, capped at 0.95.
pub fn keyword_confidence(category_count: usize, total_count: usize) -> f64 {
    let match_bonus = (category_count as f64 * MATCH_BONUS_STEP).min(MATCH_BONUS_CAP);
    let dominance_bonus = if total_count > 0 {
        category_count as f64 / total_count as f64 * DOMINANCE_WEIGHT
    } else {
        0.0
    };
    round3((CONFIDENCE_FLOOR + match_bonus + dominance_bonus).min(KEYWORD_CONFIDENCE_CAP))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_range_endpoints() {
        assert_close(normalize_confidence(0.10, 0), 0.70);
        assert_close(normalize_confidence(0.45, 0), 0.95);
    }

    #[test]
    fn test_clamps_outside_working_range() {
        assert_close(normalize_confidence(-1.0, 0), 0.70);
        assert_close(normalize_confidence(0.0, 0), 0.70);
        assert_close(normalize_confidence(0.99, 0), 0.95);
        assert_close(normalize_confidence(0.99, 10), 0.95);
    }

    #[test]
    fn test_midpoint_and_bonus() {
        // (0.275 - 0.10) / 0.35 = 0.5
        assert_close(normalize_confidence(0.275, 0), 0.825);
        // 0.5 + 0.025 = 0.525
        assert_close(normalize_confidence(0.275, 1), 0.831);
    }

    #[test]
    fn test_bonus_is_capped() {
        assert_close(normalize_confidence(0.10, 4), 0.725);
        assert_close(normalize_confidence(0.10, 40), 0.725);
    }

    #[test]
    fn test_monotonic_in_keyword_count() {
        for raw in [0.0, 0.12, 0.2, 0.3, 0.44, 0.6] {
            let mut previous = normalize_confidence(raw, 0);
            for count in 1..12 {
                let current = normalize_confidence(raw, count);
                assert!(current >= previous, "raw={raw} count={count}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_always_within_band() {
        for step in -20..=40 {
            let raw = step as f64 / 20.0;
            for count in 0..8 {
                let confidence = normalize_confidence(raw, count);
                assert!((0.70..=0.95).contains(&confidence));
            }
        }
    }

    #[test]
    fn test_nan_similarity() {
        assert_close(normalize_confidence(f64::NAN, 0), 0.70);
    }

    #[test]
    fn test_keyword_confidence() {
        // 0.70 + 0.09 + 0.05
        assert_close(keyword_confidence(3, 3), 0.84);
        // 0.70 + 0.03 + 0.025
        assert_close(keyword_confidence(1, 2), 0.755);
        // match bonus caps at 0.25 and total caps at 0.95
        assert_close(keyword_confidence(12, 12), 0.95);
        assert_close(keyword_confidence(0, 0), 0.70);
    }
}
