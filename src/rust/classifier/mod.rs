use std::sync::Arc;

use serde::Serialize;

mod arbiter;
pub mod builder;
mod category;
#[allow(clippy::module_inception)]
mod classifier;
mod confidence;
mod config;
mod embedding;
mod error;
mod keyword;
mod lexicon;
#[cfg(feature = "onnx")]
mod onnx;
mod preprocess;
mod prototype;
mod utils;

pub use arbiter::{
    arbitrate, ConfidenceBasis, Decision, DecisionPath, Evidence, LOW_SIGNAL_CONFIDENCE,
    OTHER_INDICATOR_CONFIDENCE, SIMILARITY_FLOOR, STRONG_KEYWORD_MATCHES,
};
pub use builder::ClassifierBuilder;
pub use category::{Category, PerCategory};
pub use classifier::Classifier;
pub use confidence::{keyword_confidence, normalize_confidence};
pub use config::{ClassifierConfig, DEFAULT_MIN_CONFIDENCE, MAX_LENGTH_ENV, MIN_CONFIDENCE_ENV};
pub use embedding::{Embedder, HashingEmbedder, DEFAULT_HASHING_DIMENSION};
pub use error::ClassifierError;
pub use keyword::KeywordClassifier;
pub use lexicon::{count_keywords, count_other_indicators, keyword_counts, looks_like_other, OTHER_INDICATORS};
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;
pub use preprocess::{preprocess, DEFAULT_MAX_LENGTH};
pub use prototype::{builtin_prototypes, keywords_for, CategoryPrototype};

/// The outcome of classifying one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub category: Category,
    /// In `[0, 1]`; `[0.70, 0.95]` unless a fixed shortcut value applies
    pub confidence: f64,
}

impl Classification {
    pub fn new(category: Category, confidence: f64) -> Self {
        Self { category, confidence }
    }

    /// The category's user-facing label, e.g. `"Legal Document"`
    pub fn label(&self) -> &'static str {
        self.category.label()
    }
}

impl From<&Decision> for Classification {
    fn from(decision: &Decision) -> Self {
        Self::new(decision.category, decision.confidence())
    }
}

/// Common surface of the hybrid and the keyword-only classifier, so callers
/// can hold either behind `Box<dyn CategoryClassifier>`.
pub trait CategoryClassifier: Send + Sync {
    /// Classifies `text` using the classifier's configured character budget.
    fn classify(&self, text: &str) -> Classification;

    /// Classifies `text`, keeping at most `max_length` normalized characters.
    fn classify_with_limit(&self, text: &str, max_length: usize) -> Classification;
}

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Name of the embedding backend
    pub embedder: String,
    /// Size of the embedding vectors
    pub embedding_size: usize,
    /// Every label the classifier can return
    pub categories: Vec<Category>,
    /// Descriptions and keywords of the formal categories
    pub prototypes: Arc<PerCategory<CategoryPrototype>>,
    pub min_confidence: f64,
    pub max_length: usize,
}
