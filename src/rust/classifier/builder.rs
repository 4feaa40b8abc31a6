use std::sync::Arc;

use log::info;

use super::category::{Category, PerCategory};
use super::classifier::Classifier;
use super::config::ClassifierConfig;
use super::embedding::{Embedder, HashingEmbedder};
use super::error::ClassifierError;
use super::keyword::KeywordClassifier;
use super::prototype::{builtin_prototypes, validate_description};
use super::utils::{is_zero_vector, normalize_vector};
#[cfg(feature = "onnx")]
use super::onnx::OnnxEmbedder;
#[cfg(feature = "onnx")]
use crate::{runtime::RuntimeConfig, BuiltinModel};

/// A builder for constructing a [`Classifier`] with a fluent interface.
///
/// Building is the one-time initialization step: the embedder is loaded and
/// every prototype description is embedded. A classifier is only handed out
/// once all of that succeeded.
#[derive(Debug, Default)]
pub struct ClassifierBuilder {
    embedder: Option<Arc<dyn Embedder>>,
    descriptions: PerCategory<Option<String>>,
    config: Option<ClassifierConfig>,
    #[cfg(feature = "onnx")]
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use docsort::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the classifier configuration. Without it, [`ClassifierConfig::from_env`]
    /// is used at build time.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the runtime configuration for ONNX model execution. Only affects
    /// models loaded after this call.
    #[cfg(feature = "onnx")]
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Uses `embedder` for prototypes and documents.
    pub fn with_embedder(self, embedder: impl Embedder + 'static) -> Self {
        self.with_shared_embedder(Arc::new(embedder))
    }

    /// Uses an embedder that is shared with other components.
    pub fn with_shared_embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Uses the model-free [`HashingEmbedder`].
    pub fn with_hashing_embedder(self) -> Self {
        self.with_embedder(HashingEmbedder::default())
    }

    /// Loads a built-in model from the local model cache.
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - An embedder is already set
    ///   - The model is not downloaded
    ///   - The model or tokenizer failed to load
    ///   - The model structure is invalid
    #[cfg(feature = "onnx")]
    pub fn with_model(self, model: BuiltinModel) -> Result<Self, ClassifierError> {
        self.ensure_no_embedder()?;
        let embedder = OnnxEmbedder::from_builtin(model, &self.runtime_config)?;
        info!("Loaded built-in model {:?} from {}", model, embedder.model_path());
        Ok(self.with_embedder(embedder))
    }

    /// Loads a custom ONNX model and tokenizer.
    ///
    /// `max_sequence_length` defaults to 256 tokens; longer inputs are truncated.
    ///
    /// # Example
    /// ```no_run
    /// use docsort::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_custom_model(
    ///         "path/to/model.onnx",
    ///         "path/to/tokenizer.json",
    ///         Some(512)  // Custom sequence length
    ///     );
    /// ```
    #[cfg(feature = "onnx")]
    pub fn with_custom_model(
        self,
        model_path: &str,
        tokenizer_path: &str,
        max_sequence_length: Option<usize>,
    ) -> Result<Self, ClassifierError> {
        self.ensure_no_embedder()?;
        let embedder = OnnxEmbedder::from_files(model_path, tokenizer_path, max_sequence_length, &self.runtime_config)?;
        info!("Loaded custom model from {}", embedder.model_path());
        Ok(self.with_embedder(embedder))
    }

    #[cfg(feature = "onnx")]
    fn ensure_no_embedder(&self) -> Result<(), ClassifierError> {
        if self.embedder.is_some() {
            return Err(ClassifierError::BuildError("Embedder already set".to_string()));
        }
        Ok(())
    }

    /// Replaces the built-in prototype description of a formal category.
    ///
    /// # Returns
    /// * `Err(ClassifierError::ValidationError)` if the category is `Other`,
    ///   or the description is empty or longer than 1000 characters
    ///
    /// # Example
    /// ```
    /// use docsort::{Category, ClassifierBuilder};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_description(Category::Report, "Quarterly sales figures and analysis");
    /// assert!(builder.is_ok());
    /// ```
    pub fn with_description(mut self, category: Category, description: impl Into<String>) -> Result<Self, ClassifierError> {
        let description = description.into();
        validate_description(category, &description)?;
        if let Some(slot) = self.descriptions.get_mut(category) {
            *slot = Some(description);
        }
        Ok(self)
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - No embedder has been set
    ///   - A prototype description could not be embedded
    ///   - A prototype embedding is all zeros or has the wrong dimension
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let embedder = self.embedder
            .ok_or_else(|| ClassifierError::BuildError("An embedder must be set before building".to_string()))?;
        let config = self.config.unwrap_or_else(ClassifierConfig::from_env);

        let mut prototypes = builtin_prototypes();
        for category in Category::FORMAL {
            let custom = self.descriptions.get(category).cloned().flatten();
            if let (Some(description), Some(prototype)) = (custom, prototypes.get_mut(category)) {
                prototype.description = description;
            }
        }

        let dimension = embedder.dimension();
        let prototype_embeddings = prototypes.try_map(|category, prototype| {
            info!("Embedding prototype for '{}'", category);
            let embedding = embedder.embed(&prototype.description).map_err(|e| {
                ClassifierError::BuildError(format!("Failed to embed prototype for '{}': {}", category, e))
            })?;
            let embedding = normalize_vector(&embedding);
            if embedding.len() != dimension {
                return Err(ClassifierError::BuildError(format!(
                    "Prototype embedding for '{}' has {} dimensions, embedder reports {}",
                    category,
                    embedding.len(),
                    dimension
                )));
            }
            if is_zero_vector(&embedding) {
                return Err(ClassifierError::BuildError(format!(
                    "Prototype embedding for '{}' has zero magnitude",
                    category
                )));
            }
            Ok(embedding)
        })?;

        info!(
            "Classifier ready ({} embedder, {} dimensions, min confidence {:.2})",
            embedder.name(),
            dimension,
            config.min_confidence
        );

        Ok(Classifier {
            embedder,
            prototypes: Arc::new(prototypes),
            prototype_embeddings: Arc::new(prototype_embeddings),
            fallback: KeywordClassifier::new(config.clone()),
            config,
        })
    }
}
