use ndarray::Array1;

use super::error::ClassifierError;

pub(crate) fn normalize_vector(vec: &Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        Array1::zeros(vec.len())
    }
}

pub(crate) fn is_zero_vector(vec: &Array1<f32>) -> bool {
    vec.iter().all(|&x| x == 0.0)
}

/// Cosine similarity of two L2-normalized vectors, i.e. their dot product.
pub(crate) fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> Result<f32, ClassifierError> {
    if a.len() != b.len() {
        return Err(ClassifierError::EmbeddingError(format!(
            "Embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.dot(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalize_vector() {
        let v = normalize_vector(&array![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let v = normalize_vector(&Array1::zeros(4));
        assert!(is_zero_vector(&v));
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let result = cosine_similarity(&array![1.0, 0.0], &array![1.0, 0.0, 0.0]);
        assert!(matches!(result, Err(ClassifierError::EmbeddingError(_))));
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&array![1.0, 0.0], &array![0.0, 1.0]).unwrap();
        assert_eq!(sim, 0.0);
    }
}
