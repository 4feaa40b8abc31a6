/// Embedding models that can be downloaded and verified by [`ModelManager`](crate::ModelManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinModel {
    /// MiniLM sentence embedding model, 384-dimensional output
    MiniLM,
}

/// Where to fetch a model from and how to verify it.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub model_url: String,
    pub tokenizer_url: String,
    /// Hex-encoded SHA-256 of the ONNX file
    pub model_hash: String,
    /// Hex-encoded SHA-256 of the tokenizer file
    pub tokenizer_hash: String,
}

/// Static properties of an embedding model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCharacteristics {
    pub embedding_size: usize,
    /// Longer inputs are truncated to this many tokens
    pub max_sequence_length: usize,
    pub model_size_mb: usize,
}

impl BuiltinModel {
    pub fn get_model_info(&self) -> ModelInfo {
        match self {
            BuiltinModel::MiniLM => ModelInfo {
                name: "minilm".to_string(),
                model_url: "https://huggingface.co/axar-ai/minilm/resolve/main/model.onnx".to_string(),
                tokenizer_url: "https://huggingface.co/axar-ai/minilm/resolve/main/tokenizer.json".to_string(),
                model_hash: "37f1ea074b7166e87295fce31299287d5fb79f76b8b7227fccc8a9f2f1ba4e16".to_string(),
                tokenizer_hash: "da0e79933b9ed51798a3ae27893d3c5fa4a201126cef75586296df9b4d2c62a0".to_string(),
            },
        }
    }

    pub fn characteristics(&self) -> ModelCharacteristics {
        match self {
            BuiltinModel::MiniLM => ModelCharacteristics {
                embedding_size: 384,
                max_sequence_length: 256,
                model_size_mb: 85,
            },
        }
    }
}
