use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::models::{BuiltinModel, ModelInfo};

/// Environment variable overriding the model cache root.
pub const CACHE_ENV: &str = "DOCSORT_CACHE";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
}

/// The two artifacts every built-in model consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModelFile {
    Model,
    Tokenizer,
}

impl ModelFile {
    const ALL: [ModelFile; 2] = [ModelFile::Model, ModelFile::Tokenizer];

    fn file_name(self) -> &'static str {
        match self {
            ModelFile::Model => "model.onnx",
            ModelFile::Tokenizer => "tokenizer.json",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            ModelFile::Model => "model",
            ModelFile::Tokenizer => "tokenizer",
        }
    }

    fn url(self, info: &ModelInfo) -> &str {
        match self {
            ModelFile::Model => &info.model_url,
            ModelFile::Tokenizer => &info.tokenizer_url,
        }
    }

    fn expected_hash(self, info: &ModelInfo) -> &str {
        match self {
            ModelFile::Model => &info.model_hash,
            ModelFile::Tokenizer => &info.tokenizer_hash,
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

fn file_matches(path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
    let bytes = fs::read(path)?;
    let hash = sha256_hex(&bytes);
    debug!("{:?}: {} bytes, sha256 {}", path, bytes.len(), hash);
    Ok(hash == expected_hash)
}

/// Local cache of built-in embedding models.
///
/// Files live under `<models_dir>/<model name>/` and are checked against the
/// SHA-256 hashes pinned in [`ModelInfo`]. Downloads through one manager (or
/// its clones) never run concurrently.
#[derive(Debug, Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Opens the cache at [`ModelManager::get_default_models_dir`].
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// `$DOCSORT_CACHE/models` when set, otherwise `docsort/models` under the
    /// platform cache directory, `~/.cache`, or the temp directory, whichever
    /// is available first.
    pub fn get_default_models_dir() -> PathBuf {
        Self::models_dir_from(env::var(CACHE_ENV).ok())
    }

    fn models_dir_from(cache_override: Option<String>) -> PathBuf {
        if let Some(root) = cache_override {
            return PathBuf::from(root).join("models");
        }
        let base = dirs::cache_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))
            .unwrap_or_else(env::temp_dir);
        base.join("docsort").join("models")
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    fn path_of(&self, model: BuiltinModel, file: ModelFile) -> PathBuf {
        self.models_dir
            .join(model.get_model_info().name)
            .join(file.file_name())
    }

    pub fn get_model_path(&self, model: BuiltinModel) -> PathBuf {
        self.path_of(model, ModelFile::Model)
    }

    pub fn get_tokenizer_path(&self, model: BuiltinModel) -> PathBuf {
        self.path_of(model, ModelFile::Tokenizer)
    }

    /// True when both files are present; their content is not checked.
    pub fn is_model_downloaded(&self, model: BuiltinModel) -> bool {
        ModelFile::ALL.iter().all(|&file| self.path_of(model, file).exists())
    }

    /// True when both files are present and match their pinned hashes.
    pub fn verify_model(&self, model: BuiltinModel) -> Result<bool, ModelError> {
        if !self.is_model_downloaded(model) {
            debug!("{:?} is not fully downloaded", model);
            return Ok(false);
        }
        let info = model.get_model_info();
        for file in ModelFile::ALL {
            if !file_matches(&self.path_of(model, file), file.expected_hash(&info))? {
                info!("{:?} {} file does not match its pinned hash", model, file.kind());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Fails with [`ModelError::NotDownloaded`] unless the model is present and verified.
    pub fn require_model(&self, model: BuiltinModel) -> Result<(), ModelError> {
        if self.verify_model(model)? {
            Ok(())
        } else {
            Err(ModelError::NotDownloaded(model.get_model_info().name))
        }
    }

    /// Fetches every file of `model` that is missing or fails verification.
    /// On failure, files written so far are removed.
    pub async fn download_model(&self, model: BuiltinModel) -> Result<(), ModelError> {
        let _guard = self.download_lock.lock().await;
        let info = model.get_model_info();
        fs::create_dir_all(self.models_dir.join(&info.name))?;

        for file in ModelFile::ALL {
            if let Err(e) = self.fetch_file(model, &info, file).await {
                warn!("Setting up {:?} failed: {}", model, e);
                let _ = self.remove_download(model);
                return Err(e);
            }
        }

        info!("{:?} is ready in {:?}", model, self.models_dir.join(&info.name));
        Ok(())
    }

    async fn fetch_file(&self, model: BuiltinModel, info: &ModelInfo, file: ModelFile) -> Result<(), ModelError> {
        let path = self.path_of(model, file);
        let expected = file.expected_hash(info);
        if path.exists() && file_matches(&path, expected)? {
            debug!("Keeping verified {} file {:?}", file.kind(), path);
            return Ok(());
        }

        info!("Downloading {} file from {}", file.kind(), file.url(info));
        let bytes = reqwest::get(file.url(info)).await?.error_for_status()?.bytes().await?;
        let actual = sha256_hex(&bytes);
        if actual != expected {
            return Err(ModelError::HashMismatch {
                file_type: file.kind().to_string(),
                expected: expected.to_string(),
                actual,
            });
        }

        fs::write(&path, &bytes)?;
        if !file_matches(&path, expected)? {
            return Err(ModelError::VerificationFailed);
        }
        info!("Stored {} bytes at {:?}", bytes.len(), path);
        Ok(())
    }

    /// Downloads the model unless a verified copy is already cached.
    pub async fn ensure_model_downloaded(&self, model: BuiltinModel) -> Result<(), ModelError> {
        if self.verify_model(model)? {
            return Ok(());
        }
        info!("{:?} missing or corrupt, downloading", model);
        self.remove_download(model)?;
        self.download_model(model).await
    }

    /// Deletes the cached files of `model`; missing files are ignored.
    pub fn remove_download(&self, model: BuiltinModel) -> Result<(), ModelError> {
        for file in ModelFile::ALL {
            let path = self.path_of(model, file);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_dir_resolution() {
        let path = ModelManager::models_dir_from(Some("/tmp/test-cache".to_string()));
        assert_eq!(path, PathBuf::from("/tmp/test-cache/models"));

        let path = ModelManager::models_dir_from(None);
        assert!(path.ends_with("docsort/models"));
    }

    #[test]
    fn test_model_paths() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        assert!(manager.get_model_path(BuiltinModel::MiniLM).ends_with("minilm/model.onnx"));
        assert!(manager.get_tokenizer_path(BuiltinModel::MiniLM).ends_with("minilm/tokenizer.json"));
        assert!(!manager.is_model_downloaded(BuiltinModel::MiniLM));
    }

    #[test]
    fn test_file_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        fs::write(&path, b"docsort").unwrap();

        assert!(file_matches(&path, &sha256_hex(b"docsort")).unwrap());
        assert!(!file_matches(&path, &sha256_hex(b"other")).unwrap());
    }

    #[test]
    fn test_corrupted_model_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        let model = BuiltinModel::MiniLM;

        assert!(!manager.verify_model(model).unwrap());

        let model_path = manager.get_model_path(model);
        fs::create_dir_all(model_path.parent().unwrap()).unwrap();
        fs::write(&model_path, "corrupted data").unwrap();
        fs::write(manager.get_tokenizer_path(model), "{}").unwrap();

        assert!(manager.is_model_downloaded(model));
        assert!(!manager.verify_model(model).unwrap());
        assert!(matches!(manager.require_model(model), Err(ModelError::NotDownloaded(_))));

        manager.remove_download(model).unwrap();
        assert!(!manager.is_model_downloaded(model));
    }
}
