#![cfg(feature = "onnx")]

use docsort::{BuiltinModel, Classifier, ClassifierConfig, ModelError, ModelManager};

#[test]
fn test_fresh_cache_is_empty() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path().join("models"))?;
    let model = BuiltinModel::MiniLM;

    assert!(manager.models_dir().exists());
    assert!(!manager.is_model_downloaded(model));
    assert!(!manager.verify_model(model)?);
    assert!(matches!(manager.require_model(model), Err(ModelError::NotDownloaded(_))));
    // removing nothing is fine
    manager.remove_download(model)?;
    Ok(())
}

#[test]
fn test_tampered_files_fail_verification() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let model = BuiltinModel::MiniLM;

    let model_path = manager.get_model_path(model);
    std::fs::create_dir_all(model_path.parent().unwrap())?;
    std::fs::write(&model_path, b"not an onnx graph")?;
    std::fs::write(manager.get_tokenizer_path(model), b"{}")?;

    assert!(manager.is_model_downloaded(model));
    assert!(!manager.verify_model(model)?);
    Ok(())
}

#[tokio::test]
#[ignore = "downloads the MiniLM model"]
async fn test_model_download() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let model = BuiltinModel::MiniLM;

    manager.download_model(model).await?;
    assert!(manager.is_model_downloaded(model));
    assert!(manager.verify_model(model)?);

    // a second call finds verified files and keeps them
    manager.ensure_model_downloaded(model).await?;
    assert!(manager.verify_model(model)?);
    Ok(())
}

#[tokio::test]
#[ignore = "downloads the MiniLM model"]
async fn test_corrupted_model_is_redownloaded() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let model = BuiltinModel::MiniLM;

    manager.download_model(model).await?;
    std::fs::write(manager.get_model_path(model), b"corrupted data")?;
    assert!(!manager.verify_model(model)?);

    manager.ensure_model_downloaded(model).await?;
    assert!(manager.verify_model(model)?);
    Ok(())
}

#[tokio::test]
#[ignore = "downloads the MiniLM model into the default cache"]
async fn test_minilm_classifier_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    ModelManager::new_default()?
        .ensure_model_downloaded(BuiltinModel::MiniLM)
        .await?;

    let classifier = Classifier::builder()
        .with_model(BuiltinModel::MiniLM)?
        .with_config(ClassifierConfig::default())
        .build()?;

    let result = classifier.classify(
        "WHEREAS the parties wish to enter into this agreement, the parties hereby agree \
         to the following terms and conditions.",
    );
    assert_eq!(result.category, docsort::Category::LegalDocument);
    assert!((0.70..=0.95).contains(&result.confidence));
    Ok(())
}
