use std::sync::Arc;

use log::{debug, warn};
use ndarray::Array1;

use super::arbiter::{arbitrate, Decision, DecisionPath, Evidence, OTHER_INDICATOR_CONFIDENCE};
use super::category::{Category, PerCategory};
use super::config::ClassifierConfig;
use super::embedding::Embedder;
use super::error::ClassifierError;
use super::keyword::KeywordClassifier;
use super::lexicon::{keyword_counts, looks_like_other};
use super::preprocess::preprocess;
use super::prototype::CategoryPrototype;
use super::utils::{cosine_similarity, normalize_vector};
use super::{CategoryClassifier, Classification};

/// A thread-safe hybrid document classifier.
///
/// Lexical evidence (strong keyword matches) is fused with semantic evidence
/// (cosine similarity between the document embedding and a prototype
/// embedding per category). Prototypes are embedded once by
/// [`ClassifierBuilder::build`](super::ClassifierBuilder::build); after that
/// the classifier is immutable and classification never fails.
///
/// # Thread Safety
///
/// This type is automatically `Send + Sync`: the embedder is
/// `Send + Sync` by trait bound and all shared state sits behind `Arc`.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use docsort::{Category, Classifier, HashingEmbedder};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::builder()
///     .with_embedder(HashingEmbedder::default())
///     .build()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// let handle = thread::spawn(move || {
///     classifier_clone.classify("This agreement between the parties is legally binding")
/// });
/// assert_eq!(handle.join().unwrap().category, Category::LegalDocument);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) prototypes: Arc<PerCategory<CategoryPrototype>>,
    pub(crate) prototype_embeddings: Arc<PerCategory<Array1<f32>>>,
    pub(crate) config: ClassifierConfig,
    pub(crate) fallback: KeywordClassifier,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            embedder: self.embedder.name().to_string(),
            embedding_size: self.embedder.dimension(),
            categories: Category::ALL.to_vec(),
            prototypes: Arc::clone(&self.prototypes),
            min_confidence: self.config.min_confidence,
            max_length: self.config.max_length,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classifies `text` using the configured character budget.
    ///
    /// # Example
    /// ```rust
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use docsort::{Category, Classifier, HashingEmbedder};
    ///
    /// let classifier = Classifier::builder()
    ///     .with_embedder(HashingEmbedder::default())
    ///     .build()?;
    ///
    /// let result = classifier.classify("");
    /// assert_eq!(result.category, Category::Other);
    /// assert_eq!(result.confidence, 0.70);
    /// # Ok(())
    /// # }
    /// ```
    pub fn classify(&self, text: &str) -> Classification {
        self.classify_with_limit(text, self.config.max_length)
    }

    /// Classifies `text`, keeping at most `max_length` normalized characters.
    pub fn classify_with_limit(&self, text: &str, max_length: usize) -> Classification {
        Classification::from(&self.explain_with_limit(text, max_length))
    }

    /// Like [`Classifier::classify`], but returns the full decision trace.
    pub fn explain(&self, text: &str) -> Decision {
        self.explain_with_limit(text, self.config.max_length)
    }

    /// Like [`Classifier::classify_with_limit`], but returns the full decision trace.
    pub fn explain_with_limit(&self, text: &str, max_length: usize) -> Decision {
        self.decide(&preprocess(text, max_length))
    }

    /// Decides the category of already preprocessed text.
    ///
    /// Empty text and text flagged by the other-detector short-circuit
    /// before the embedder is called.
    pub fn decide(&self, normalized: &str) -> Decision {
        if normalized.is_empty() {
            return Decision::shortcut(Category::Other, self.config.min_confidence, DecisionPath::EmptyInput);
        }

        if looks_like_other(normalized) {
            debug!("Other (detected creative/misc content)");
            return Decision::shortcut(Category::Other, OTHER_INDICATOR_CONFIDENCE, DecisionPath::OtherIndicators);
        }

        let keyword_counts = keyword_counts(normalized);
        let similarities = match self.similarities(normalized) {
            Ok(similarities) => similarities,
            Err(e) => {
                warn!("Embedding failed, falling back to keyword matching: {}", e);
                let fallback = self.fallback.classify_normalized(normalized);
                return Decision::shortcut(fallback.category, fallback.confidence, DecisionPath::KeywordFallback);
            }
        };

        let decision = arbitrate(Evidence { keyword_counts, similarities });
        debug!(
            "{} via {:?} [keywords: {:?}, similarities: {:?}]",
            decision.category,
            decision.path,
            keyword_counts,
            similarities
        );
        decision
    }

    /// Cosine similarity between the embedding of `text` and every prototype.
    ///
    /// # Errors
    /// - Any error from the embedder
    /// - `EmbeddingError` if the document vector's dimension differs from the prototypes'
    pub fn similarities(&self, text: &str) -> Result<PerCategory<f32>, ClassifierError> {
        let document = normalize_vector(&self.embedder.embed(text)?);
        let prototypes = self.prototype_embeddings.as_ref();
        Ok(PerCategory {
            resume: cosine_similarity(&document, &prototypes.resume)?,
            report: cosine_similarity(&document, &prototypes.report)?,
            legal_document: cosine_similarity(&document, &prototypes.legal_document)?,
        })
    }
}

impl CategoryClassifier for Classifier {
    fn classify(&self, text: &str) -> Classification {
        Classifier::classify(self, text)
    }

    fn classify_with_limit(&self, text: &str, max_length: usize) -> Classification {
        Classifier::classify_with_limit(self, text, max_length)
    }
}
