use serde::Serialize;

use super::category::{Category, PerCategory};
use super::confidence::normalize_confidence;

/// Distinct keyword matches at which lexical evidence overrides semantic
/// similarity. Tunable.
pub const STRONG_KEYWORD_MATCHES: usize = 3;
/// Formal-category decisions whose basis falls below this are reported as
/// `Other`. Tunable.
pub const SIMILARITY_FLOOR: f64 = 0.15;
/// Fixed confidence for text flagged by the other-detector.
pub const OTHER_INDICATOR_CONFIDENCE: f64 = 0.82;
/// Fixed confidence when a low similarity basis forces `Other`.
pub const LOW_SIGNAL_CONFIDENCE: f64 = 0.75;

/// The signal the final confidence is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ConfidenceBasis {
    /// Reported as is, bypassing normalization
    Fixed(f64),
    /// Raw cosine similarity fed through the confidence normalizer
    Similarity(f64),
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecisionPath {
    /// Nothing left after preprocessing
    EmptyInput,
    /// The other-detector fired before any scoring
    OtherIndicators,
    /// One category matched at least [`STRONG_KEYWORD_MATCHES`] keywords
    StrongKeywords,
    /// The semantically closest category is corroborated by a keyword
    CorroboratedSimilarity,
    /// No formal category matched a single keyword
    NoKeywords,
    /// Keywords matched elsewhere, but similarity decides
    SimilarityFallback,
    /// The basis was under [`SIMILARITY_FLOOR`]
    LowSimilarity,
    /// Embedding failed; the keyword-only classifier decided
    KeywordFallback,
}

/// Per-category lexical and semantic scores for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub keyword_counts: PerCategory<usize>,
    pub similarities: PerCategory<f32>,
}

/// A category decision together with how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub category: Category,
    pub basis: ConfidenceBasis,
    pub path: DecisionPath,
    /// Absent for the shortcuts that skip scoring
    pub evidence: Option<Evidence>,
}

impl Decision {
    pub(crate) fn shortcut(category: Category, confidence: f64, path: DecisionPath) -> Self {
        Self {
            category,
            basis: ConfidenceBasis::Fixed(confidence),
            path,
            evidence: None,
        }
    }

    /// Keyword matches of the decided category; 0 for `Other`.
    pub fn keyword_count(&self) -> usize {
        self.evidence
            .as_ref()
            .and_then(|evidence| evidence.keyword_counts.get(self.category).copied())
            .unwrap_or(0)
    }

    /// Final, user-facing confidence.
    pub fn confidence(&self) -> f64 {
        match self.basis {
            ConfidenceBasis::Fixed(confidence) => confidence,
            ConfidenceBasis::Similarity(raw) => normalize_confidence(raw, self.keyword_count()),
        }
    }
}

/// Fuses lexical and semantic evidence into a category.
///
/// Rules, first match wins:
/// 1. the best keyword count reaches [`STRONG_KEYWORD_MATCHES`]: the
///    keyword-best category wins, with the best similarity of any category
///    as its basis (not the winner's own similarity)
/// 2. the similarity-best category has at least one keyword: it wins
/// 3. no category has any keyword: `Other` with basis 0.0
/// 4. otherwise the similarity-best category wins
///
/// A formal category whose basis ends up below [`SIMILARITY_FLOOR`] is
/// replaced by `Other` at [`LOW_SIGNAL_CONFIDENCE`].
pub fn arbitrate(evidence: Evidence) -> Decision {
    let (best_keyword_category, best_keyword_count) = evidence.keyword_counts.argmax();
    let (best_sim_category, best_sim) = evidence.similarities.argmax();
    let best_sim = f64::from(best_sim);
    let best_sim_keywords = evidence.keyword_counts.get(best_sim_category).copied().unwrap_or(0);

    let (category, basis, path) = if best_keyword_count >= STRONG_KEYWORD_MATCHES {
        (best_keyword_category, best_sim, DecisionPath::StrongKeywords)
    } else if best_sim_keywords >= 1 {
        (best_sim_category, best_sim, DecisionPath::CorroboratedSimilarity)
    } else if best_keyword_count == 0 {
        (Category::Other, 0.0, DecisionPath::NoKeywords)
    } else {
        (best_sim_category, best_sim, DecisionPath::SimilarityFallback)
    };

    if category.is_formal() && (basis.is_nan() || basis < SIMILARITY_FLOOR) {
        return Decision {
            category: Category::Other,
            basis: ConfidenceBasis::Fixed(LOW_SIGNAL_CONFIDENCE),
            path: DecisionPath::LowSimilarity,
            evidence: Some(evidence),
        };
    }

    Decision {
        category,
        basis: ConfidenceBasis::Similarity(basis),
        path,
        evidence: Some(evidence),
    }
}
