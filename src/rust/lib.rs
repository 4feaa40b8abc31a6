//! A thread-safe document category classifier.
//!
//! Text is sorted into one of `Resume`, `Report`, `Legal Document` or
//! `Other`, with a confidence score. Strong keyword matches are combined with
//! the cosine similarity between the document's embedding and a prototype
//! embedding per category.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docsort::{Category, Classifier, HashingEmbedder};
//!
//! let classifier = Classifier::builder()
//!     .with_embedder(HashingEmbedder::default())
//!     .build()?;
//!
//! let result = classifier.classify(
//!     "This Agreement is made between the Parties. The terms and conditions \
//!      herein are legally binding.",
//! );
//! assert_eq!(result.category, Category::LegalDocument);
//! assert!((0.70..=0.95).contains(&result.confidence));
//! # Ok(())
//! # }
//! ```
//!
//! With the `onnx` feature (enabled by default), the built-in MiniLM model
//! can be downloaded with [`ModelManager`] and loaded through
//! `ClassifierBuilder::with_model`.
//!
//! # Thread Safety
//!
//! The classifier is immutable once built and can be shared across threads
//! using `Arc`:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docsort::{Classifier, HashingEmbedder};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(Classifier::builder()
//!     .with_embedder(HashingEmbedder::default())
//!     .build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.classify("Quarterly report: findings and recommendations");
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
#[cfg(feature = "onnx")]
pub mod model_manager;
#[cfg(feature = "onnx")]
pub mod models;
#[cfg(feature = "onnx")]
mod runtime;

pub use classifier::{
    Category, CategoryClassifier, Classification, Classifier, ClassifierBuilder, ClassifierConfig,
    ClassifierError, ClassifierInfo, Decision, DecisionPath, Embedder, HashingEmbedder,
    KeywordClassifier,
};
#[cfg(feature = "onnx")]
pub use classifier::OnnxEmbedder;
#[cfg(feature = "onnx")]
pub use model_manager::{ModelError, ModelManager};
#[cfg(feature = "onnx")]
pub use models::{BuiltinModel, ModelCharacteristics, ModelInfo};
#[cfg(feature = "onnx")]
pub use runtime::{create_session_builder, Optimization, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
