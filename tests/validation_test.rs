use std::collections::HashMap;

use docsort::{Category, Classifier, ClassifierConfig, ClassifierError, Embedder, HashingEmbedder};
use ndarray::Array1;

/// Hashes everything except one phrase, which embeds to all zeros.
#[derive(Debug)]
struct BlindSpotEmbedder {
    inner: HashingEmbedder,
    blind_spot: &'static str,
}

impl Embedder for BlindSpotEmbedder {
    fn name(&self) -> &str {
        "blind-spot"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        if text == self.blind_spot {
            return Ok(Array1::zeros(self.dimension()));
        }
        self.inner.embed(text)
    }
}

#[test]
fn test_missing_embedder() {
    let result = Classifier::builder().with_config(ClassifierConfig::default()).build();
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_other_has_no_prototype() {
    let result = Classifier::builder().with_description(Category::Other, "poems and stories");
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_description_length_limits() {
    assert!(matches!(
        Classifier::builder().with_description(Category::Resume, "   "),
        Err(ClassifierError::ValidationError(_))
    ));
    assert!(matches!(
        Classifier::builder().with_description(Category::Resume, "é".repeat(1001)),
        Err(ClassifierError::ValidationError(_))
    ));
    // the limit counts characters, not bytes
    assert!(Classifier::builder()
        .with_description(Category::Resume, "é".repeat(1000))
        .is_ok());
}

#[test]
fn test_zero_magnitude_prototype_fails_build() {
    let embedder = BlindSpotEmbedder {
        inner: HashingEmbedder::default(),
        blind_spot: "signed contracts",
    };
    let result = Classifier::builder()
        .with_embedder(embedder)
        .with_description(Category::LegalDocument, "signed contracts")
        .and_then(|builder| builder.with_config(ClassifierConfig::default()).build());

    match result {
        Err(ClassifierError::BuildError(message)) => assert!(message.contains("Legal Document")),
        other => panic!("expected a build error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_zero_hashing_dimension() {
    assert!(matches!(HashingEmbedder::new(0), Err(ClassifierError::ValidationError(_))));
    assert_eq!(HashingEmbedder::new(16).unwrap().dimension(), 16);
}

#[test]
fn test_config_lookup() {
    let vars: HashMap<&str, &str> = [("MIN_CONFIDENCE_THRESHOLD", "0.8"), ("DOCSORT_MAX_LENGTH", "abc")]
        .into_iter()
        .collect();
    let config = ClassifierConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(config.min_confidence, 0.8);
    assert_eq!(config.max_length, 3000);

    let classifier = Classifier::builder()
        .with_embedder(HashingEmbedder::default())
        .with_config(config)
        .build()
        .unwrap();
    assert_eq!(classifier.classify("").confidence, 0.8);
}
