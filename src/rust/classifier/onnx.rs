use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, error, info};
use ndarray::{Array1, Array2, Axis};
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;

use super::embedding::Embedder;
use super::error::ClassifierError;
use super::utils::normalize_vector;
use crate::runtime::{create_session_builder, RuntimeConfig};
use crate::{BuiltinModel, ModelCharacteristics, ModelManager};

/// Sentence embeddings from an ONNX transformer model.
///
/// The model is expected to:
/// - Accept `input_ids` and `attention_mask` (and optionally `token_type_ids`),
///   each shaped `[batch_size, sequence_length]`
/// - Output token embeddings `[batch_size, sequence_length, embedding_size]`,
///   which are mean-pooled, or an already pooled `[batch_size, embedding_size]`
///
/// `Session` and `Tokenizer` are shared behind `Arc`, so the embedder is
/// `Send + Sync` and can serve concurrent classification calls.
#[derive(Debug)]
pub struct OnnxEmbedder {
    model_path: String,
    tokenizer_path: String,
    tokenizer: Arc<Tokenizer>,
    session: Arc<Session>,
    characteristics: ModelCharacteristics,
}

impl OnnxEmbedder {
    /// Loads a built-in model from the local model cache.
    ///
    /// # Errors
    /// - `BuildError` if the model is not downloaded yet or fails to load
    /// - `ModelError` if the model does not have the expected inputs/outputs
    pub fn from_builtin(model: BuiltinModel, runtime_config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        let manager = ModelManager::new_default()
            .map_err(|e| ClassifierError::BuildError(format!("Failed to create model manager: {}", e)))?;

        if !manager.is_model_downloaded(model) {
            return Err(ClassifierError::BuildError(format!(
                "Model '{:?}' is not downloaded. Please download it first using ModelManager::download_model()",
                model
            )));
        }

        let model_path = manager.get_model_path(model);
        let tokenizer_path = manager.get_tokenizer_path(model);
        let (tokenizer, session) = Self::load(&model_path, &tokenizer_path, runtime_config)?;

        Ok(Self {
            model_path: model_path.to_string_lossy().to_string(),
            tokenizer_path: tokenizer_path.to_string_lossy().to_string(),
            tokenizer: Arc::new(tokenizer),
            session: Arc::new(session),
            characteristics: model.characteristics(),
        })
    }

    /// Loads a model/tokenizer pair from arbitrary paths. The embedding size
    /// is inferred by embedding a probe sentence; `max_sequence_length`
    /// defaults to 256 tokens.
    pub fn from_files(
        model_path: &str,
        tokenizer_path: &str,
        max_sequence_length: Option<usize>,
        runtime_config: &RuntimeConfig,
    ) -> Result<Self, ClassifierError> {
        if model_path.is_empty() || tokenizer_path.is_empty() {
            return Err(ClassifierError::BuildError("Model and tokenizer paths cannot be empty".to_string()));
        }
        if !Path::new(model_path).exists() {
            return Err(ClassifierError::BuildError(format!("Model file not found: {}", model_path)));
        }
        if !Path::new(tokenizer_path).exists() {
            return Err(ClassifierError::BuildError(format!("Tokenizer file not found: {}", tokenizer_path)));
        }

        let (tokenizer, session) = Self::load(Path::new(model_path), Path::new(tokenizer_path), runtime_config)?;
        let mut embedder = Self {
            model_path: model_path.to_string(),
            tokenizer_path: tokenizer_path.to_string(),
            tokenizer: Arc::new(tokenizer),
            session: Arc::new(session),
            characteristics: ModelCharacteristics {
                embedding_size: 0,
                max_sequence_length: max_sequence_length.unwrap_or(256),
                model_size_mb: 0, // Not critical for functionality
            },
        };

        let probe = embedder.embed("Test input to infer embedding size")?;
        info!("Inferred embedding size from model: {}", probe.len());
        embedder.characteristics.embedding_size = probe.len();
        Ok(embedder)
    }

    fn load(
        model_path: &Path,
        tokenizer_path: &Path,
        runtime_config: &RuntimeConfig,
    ) -> Result<(Tokenizer, Session), ClassifierError> {
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            error!("Failed to load tokenizer: {}", e);
            ClassifierError::BuildError(format!("Failed to load tokenizer: {}", e))
        })?;
        info!("Tokenizer loaded successfully");

        let session = create_session_builder(runtime_config)?.commit_from_file(model_path)?;
        Self::validate_model(&session)?;
        info!("Model structure validated successfully");

        Ok((tokenizer, session))
    }

    pub fn model_path(&self) -> &str {
        &self.model_path
    }

    pub fn tokenizer_path(&self) -> &str {
        &self.tokenizer_path
    }

    pub fn characteristics(&self) -> &ModelCharacteristics {
        &self.characteristics
    }

    /// Counts the tokens of `text` without running the model.
    pub fn count_tokens(&self, text: &str) -> Result<usize, ClassifierError> {
        self.tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))
            .map(|encoding| encoding.get_ids().len())
    }

    /// Tokenizes `text`, keeping at most `max_sequence_length` tokens.
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ClassifierError> {
        let encoding = self.tokenizer
            .encode(text, true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;
        let mut token_ids = encoding.get_ids().to_vec();

        let max_length = self.characteristics.max_sequence_length;
        if token_ids.len() > max_length {
            debug!("Truncating input from {} to {} tokens", token_ids.len(), max_length);
            token_ids.truncate(max_length);
        }
        if token_ids.is_empty() {
            return Err(ClassifierError::TokenizerError("Tokenizer produced no tokens".into()));
        }
        Ok(token_ids)
    }

    /// Runs the model over token IDs and pools the output into one vector.
    fn get_embedding(&self, tokens: &[u32]) -> Result<Array1<f32>, ClassifierError> {
        let input_array = Array2::from_shape_vec((1, tokens.len()),
            tokens.iter().map(|&x| x as i64).collect())
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input_ids = input_dyn.as_standard_layout();

        let mask_array = Array2::<i64>::ones((1, tokens.len()));
        let mask_dyn = mask_array.into_dyn();
        let attention_mask = mask_dyn.as_standard_layout();

        let type_array = Array2::<i64>::zeros((1, tokens.len()));
        let type_dyn = type_array.into_dyn();
        let token_type_ids = type_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert("input_ids", Tensor::from_array(&input_ids)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?);
        input_tensors.insert("attention_mask", Tensor::from_array(&attention_mask)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create mask tensor: {}", e)))?);
        if self.session.inputs.iter().any(|input| input.name == "token_type_ids") {
            input_tensors.insert("token_type_ids", Tensor::from_array(&token_type_ids)
                .map_err(|e| ClassifierError::ModelError(format!("Failed to create token type tensor: {}", e)))?);
        }

        let outputs = self.session.run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0].try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e)))?;

        let embedding = match output_tensor.ndim() {
            3 => output_tensor
                .index_axis(Axis(0), 0)
                .mean_axis(Axis(0))
                .ok_or_else(|| ClassifierError::ModelError("Model returned an empty sequence".into()))?
                .into_dimensionality::<ndarray::Ix1>()
                .map_err(|e| ClassifierError::ModelError(format!("Unexpected pooled shape: {}", e)))?,
            2 => output_tensor
                .index_axis(Axis(0), 0)
                .to_owned()
                .into_dimensionality::<ndarray::Ix1>()
                .map_err(|e| ClassifierError::ModelError(format!("Unexpected output shape: {}", e)))?,
            other => {
                return Err(ClassifierError::ModelError(format!(
                    "Expected a 2D or 3D output tensor, got {} dimensions",
                    other
                )))
            }
        };

        Ok(normalize_vector(&embedding))
    }

    /// Validates that the model has the expected input/output structure
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        let inputs = &session.inputs;
        if inputs.len() < 2 {
            return Err(ClassifierError::ModelError(
                format!("Model must have at least 2 inputs (input_ids and attention_mask), found {}", inputs.len())
            ));
        }

        let outputs = &session.outputs;
        if outputs.is_empty() {
            return Err(ClassifierError::ModelError(
                "Model must have at least 1 output for embeddings".to_string()
            ));
        }

        Ok(())
    }
}

impl Embedder for OnnxEmbedder {
    fn name(&self) -> &str {
        "onnx"
    }

    fn dimension(&self) -> usize {
        self.characteristics.embedding_size
    }

    fn embed(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        let tokens = self.tokenize(text)?;
        self.get_embedding(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_are_build_errors() {
        let config = RuntimeConfig::default();
        assert!(matches!(
            OnnxEmbedder::from_files("", "tokenizer.json", None, &config),
            Err(ClassifierError::BuildError(_))
        ));
        assert!(matches!(
            OnnxEmbedder::from_files("/nonexistent/model.onnx", "/nonexistent/tokenizer.json", None, &config),
            Err(ClassifierError::BuildError(_))
        ));
    }

    #[test]
    #[ignore = "requires the MiniLM model in the local cache"]
    fn test_minilm_embedding() {
        let embedder = OnnxEmbedder::from_builtin(BuiltinModel::MiniLM, &RuntimeConfig::default())
            .expect("Failed to load MiniLM");
        let vector = embedder.embed("employment history and education").unwrap();
        assert_eq!(vector.len(), 384);
        assert!(embedder.count_tokens("test text").unwrap() > 0);
        assert_eq!(vector, embedder.embed("employment history and education").unwrap());
    }
}
