use std::env;

use log::warn;

use super::preprocess::DEFAULT_MAX_LENGTH;

/// Environment variable holding the confidence reported for empty input.
pub const MIN_CONFIDENCE_ENV: &str = "MIN_CONFIDENCE_THRESHOLD";
/// Environment variable overriding the preprocessing character budget.
pub const MAX_LENGTH_ENV: &str = "DOCSORT_MAX_LENGTH";

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.70;

/// Runtime knobs of the classifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Confidence reported when the text is empty after preprocessing
    pub min_confidence: f64,
    /// Character budget applied after normalization
    pub max_length: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl ClassifierConfig {
    /// Reads `MIN_CONFIDENCE_THRESHOLD` and `DOCSORT_MAX_LENGTH`, falling back
    /// to the defaults for unset or invalid values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClassifierConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(MIN_CONFIDENCE_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(value) if (0.0..=1.0).contains(&value) => config.min_confidence = value,
                _ => warn!(
                    "Ignoring {}={:?}: expected a number between 0 and 1",
                    MIN_CONFIDENCE_ENV, raw
                ),
            }
        }

        if let Some(raw) = lookup(MAX_LENGTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => config.max_length = value,
                _ => warn!(
                    "Ignoring {}={:?}: expected a positive integer",
                    MAX_LENGTH_ENV, raw
                ),
            }
        }

        config
    }
}
