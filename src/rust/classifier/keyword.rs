use log::debug;

use super::arbiter::{LOW_SIGNAL_CONFIDENCE, OTHER_INDICATOR_CONFIDENCE};
use super::category::Category;
use super::config::ClassifierConfig;
use super::confidence::keyword_confidence;
use super::lexicon::{keyword_counts, looks_like_other};
use super::preprocess::preprocess;
use super::{CategoryClassifier, Classification};

/// Lightweight classifier that relies on keyword matches alone.
///
/// It needs no embedding model. The hybrid [`Classifier`](super::Classifier)
/// also uses it whenever embedding a document fails.
///
/// ```
/// use docsort::{Category, ClassifierConfig, KeywordClassifier};
///
/// let classifier = KeywordClassifier::new(ClassifierConfig::default());
/// let result = classifier.classify("Work experience, education and skills");
/// assert_eq!(result.category, Category::Resume);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    config: ClassifierConfig,
}

impl KeywordClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Builds a classifier configured from the environment.
    pub fn from_env() -> Self {
        Self::new(ClassifierConfig::from_env())
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn classify(&self, text: &str) -> Classification {
        self.classify_with_limit(text, self.config.max_length)
    }

    pub fn classify_with_limit(&self, text: &str, max_length: usize) -> Classification {
        self.classify_normalized(&preprocess(text, max_length))
    }

    /// Classifies text that has already been through [`preprocess`].
    pub fn classify_normalized(&self, normalized: &str) -> Classification {
        if normalized.is_empty() {
            return Classification::new(Category::Other, self.config.min_confidence);
        }

        if looks_like_other(normalized) {
            debug!("Other (detected creative/misc content)");
            return Classification::new(Category::Other, OTHER_INDICATOR_CONFIDENCE);
        }

        let counts = keyword_counts(normalized);
        let (best_category, best_count) = counts.argmax();

        if best_count == 0 {
            debug!("Other (no keywords matched)");
            return Classification::new(Category::Other, LOW_SIGNAL_CONFIDENCE);
        }

        let total: usize = counts.iter().map(|(_, &count)| count).sum();
        let confidence = keyword_confidence(best_count, total);
        debug!("{} ({:.1}%) [keywords: {:?}]", best_category, confidence * 100.0, counts);
        Classification::new(best_category, confidence)
    }
}

impl CategoryClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Classification {
        KeywordClassifier::classify(self, text)
    }

    fn classify_with_limit(&self, text: &str, max_length: usize) -> Classification {
        KeywordClassifier::classify_with_limit(self, text, max_length)
    }
}
