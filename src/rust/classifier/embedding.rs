use std::fmt::Debug;

use ndarray::Array1;
use sha2::{Digest, Sha256};

use super::error::ClassifierError;
use super::utils::normalize_vector;

/// Turns text into a fixed-length, L2-normalized embedding vector.
///
/// Implementations must be deterministic (the same text always yields the
/// same vector regardless of call order) and safe to call from several
/// threads at once; the classifier shares one embedder across all callers
/// without locking.
///
/// # Custom implementation
/// ```
/// use docsort::{ClassifierError, Embedder};
/// use ndarray::Array1;
///
/// #[derive(Debug)]
/// struct LengthEmbedder;
///
/// impl Embedder for LengthEmbedder {
///     fn name(&self) -> &str {
///         "length"
///     }
///
///     fn dimension(&self) -> usize {
///         2
///     }
///
///     fn embed(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
///         Ok(Array1::from(vec![1.0, text.len() as f32]))
///     }
/// }
/// ```
pub trait Embedder: Send + Sync + Debug {
    /// Short identifier used in logs and [`ClassifierInfo`](super::ClassifierInfo)
    fn name(&self) -> &str;

    /// Length of the vectors returned by [`Embedder::embed`]
    fn dimension(&self) -> usize;

    /// Embeds `text`. The classifier normalizes the result again, so
    /// implementations may return unnormalized vectors.
    ///
    /// # Errors
    /// - `EmbeddingError`, `TokenizerError` or `ModelError` when the backend fails
    fn embed(&self, text: &str) -> Result<Array1<f32>, ClassifierError>;
}

/// Dimension of [`HashingEmbedder::default`], matching MiniLM.
pub const DEFAULT_HASHING_DIMENSION: usize = 384;

/// A model-free embedder based on feature hashing.
///
/// Every alphanumeric token is lower-cased and hashed with SHA-256 into one
/// of `dimension` buckets with a hash-derived sign; the bucket counts are
/// L2-normalized. Similarity between two texts therefore tracks their shared
/// vocabulary. It needs no model files and is stable across platforms and
/// releases, which makes it suitable for offline use and tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Result<Self, ClassifierError> {
        if dimension == 0 {
            return Err(ClassifierError::ValidationError(
                "Hashing embedder dimension must be positive".into(),
            ));
        }
        Ok(Self { dimension })
    }

    fn bucket(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(head) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimension: DEFAULT_HASHING_DIMENSION }
    }
}

impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        let mut vector = Array1::<f32>::zeros(self.dimension);
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let (index, sign) = self.bucket(&token.to_lowercase());
            vector[index] += sign;
        }
        Ok(normalize_vector(&vector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::utils::cosine_similarity;

    #[test]
    fn test_hashing_is_deterministic() {
        let first = HashingEmbedder::default();
        let second = HashingEmbedder::default();
        let text = "Quarterly performance report";
        let a = first.embed(text).unwrap();
        // unrelated call in between must not change anything
        first.embed("something else entirely").unwrap();
        let b = second.embed(text).unwrap();
        assert_eq!(a, first.embed(text).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_hashing_output_is_normalized() {
        let embedder = HashingEmbedder::new(64).unwrap();
        let v = embedder.embed("terms and conditions of the agreement").unwrap();
        assert_eq!(v.len(), 64);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_ignores_case_and_punctuation() {
        let embedder = HashingEmbedder::default();
        assert_eq!(
            embedder.embed("Binding Contract!").unwrap(),
            embedder.embed("binding, contract").unwrap()
        );
    }

    #[test]
    fn test_hashing_empty_text_is_zero() {
        let embedder = HashingEmbedder::default();
        let v = embedder.embed("  ...  ").unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_shared_vocabulary_is_more_similar() {
        let embedder = HashingEmbedder::default();
        let doc = embedder.embed("contract between the parties").unwrap();
        let close = embedder.embed("a contract signed by both parties").unwrap();
        let far = embedder.embed("quarterly revenue statistics").unwrap();
        assert!(cosine_similarity(&doc, &close).unwrap() > cosine_similarity(&doc, &far).unwrap());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(HashingEmbedder::new(0), Err(ClassifierError::ValidationError(_))));
    }
}
