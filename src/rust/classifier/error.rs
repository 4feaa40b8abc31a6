/// Represents the different types of errors that can occur while building or running the classifier.
///
/// Only construction can fail from a caller's point of view: once a
/// [`Classifier`](super::Classifier) is built, classification is total and
/// embedding failures are absorbed by the keyword fallback.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Error occurred while loading or using the tokenizer
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),
    /// Error occurred while loading or running the ONNX model
    #[error("Model error: {0}")]
    ModelError(String),
    /// Error occurred during the build phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred while turning text into an embedding vector
    #[error("Embedding error: {0}")]
    EmbeddingError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(feature = "onnx")]
impl From<ort::Error> for ClassifierError {
    fn from(err: ort::Error) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}
