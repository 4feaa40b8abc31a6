use std::sync::OnceLock;

use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use ort::Result as OrtResult;

static ENVIRONMENT: OnceLock<Result<(), String>> = OnceLock::new();

/// How aggressively ONNX Runtime rewrites the model graph before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optimization {
    Disabled,
    Basic,
    Extended,
    #[default]
    All,
}

impl Optimization {
    fn level(self) -> GraphOptimizationLevel {
        match self {
            Optimization::Disabled => GraphOptimizationLevel::Disable,
            Optimization::Basic => GraphOptimizationLevel::Level1,
            Optimization::Extended => GraphOptimizationLevel::Level2,
            Optimization::All => GraphOptimizationLevel::Level3,
        }
    }
}

/// Threading and graph optimization settings for embedding sessions.
///
/// A thread count of 0 leaves the choice to ONNX Runtime.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeConfig {
    pub inter_threads: usize,
    pub intra_threads: usize,
    pub optimization: Optimization,
}

impl RuntimeConfig {
    /// One thread for everything; useful when many classifiers share a host.
    pub fn single_threaded() -> Self {
        Self {
            inter_threads: 1,
            intra_threads: 1,
            ..Self::default()
        }
    }
}

/// Initializes the process-wide ONNX Runtime environment on first use. Later
/// calls return the first outcome.
pub fn ensure_initialized() -> Result<(), String> {
    ENVIRONMENT
        .get_or_init(|| {
            ort::init()
                .with_name("docsort")
                .commit()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .clone()
}

/// A session builder configured from `config`. A failed environment setup is
/// logged; ONNX Runtime then falls back to its default environment.
pub fn create_session_builder(config: &RuntimeConfig) -> OrtResult<SessionBuilder> {
    if let Err(message) = ensure_initialized() {
        log::warn!("ONNX Runtime environment failed to initialize: {}", message);
    }

    let mut builder = Session::builder()?.with_optimization_level(config.optimization.level())?;
    if config.inter_threads > 0 {
        builder = builder.with_inter_threads(config.inter_threads)?;
    }
    if config.intra_threads > 0 {
        builder = builder.with_intra_threads(config.intra_threads)?;
    }
    Ok(builder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_initialized_once() {
        let first = ensure_initialized();
        assert_eq!(first, ensure_initialized());
    }

    #[test]
    fn test_config_presets() {
        let config = RuntimeConfig::default();
        assert_eq!(config.inter_threads, 0);
        assert_eq!(config.optimization, Optimization::All);

        let single = RuntimeConfig::single_threaded();
        assert_eq!((single.inter_threads, single.intra_threads), (1, 1));
        assert_eq!(single.clone(), single);
    }

    #[test]
    fn test_optimization_levels() {
        assert!(matches!(Optimization::Disabled.level(), GraphOptimizationLevel::Disable));
        assert!(matches!(Optimization::Basic.level(), GraphOptimizationLevel::Level1));
        assert!(matches!(Optimization::All.level(), GraphOptimizationLevel::Level3));
    }

    #[test]
    #[ignore = "needs the ONNX Runtime shared library"]
    fn test_session_builder_config() {
        let config = RuntimeConfig {
            inter_threads: 2,
            intra_threads: 2,
            optimization: Optimization::Basic,
        };
        assert!(create_session_builder(&config).is_ok());
    }
}
