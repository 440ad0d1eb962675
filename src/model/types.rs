//! External model contract.

use std::fmt;

/// Step of the scoring pipeline that produced a [`ScoringError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringStage {
    Standardize,
    Predict,
}

impl fmt::Display for ScoringStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStage::Standardize => f.write_str("standardize"),
            ScoringStage::Predict => f.write_str("predict"),
        }
    }
}

/// Failure inside the standardization transform or the model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("{stage}: expected {expected} values, got {actual}")]
    DimensionMismatch {
        stage: ScoringStage,
        expected: usize,
        actual: usize,
    },

    #[error("{stage}: produced a non-finite value")]
    NonFinite { stage: ScoringStage },

    #[error("model error: {0}")]
    Model(String),
}

/// Input standardization fitted alongside the model.
pub trait Standardizer: Send + Sync {
    /// Number of features expected, if the transform knows it.
    fn dimension(&self) -> Option<usize> {
        None
    }

    /// Maps a raw feature vector into the model's input space.
    fn standardize(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError>;
}

/// Pre-trained completion-rate regressor.
///
/// Returns the predicted fraction of the daily target a unit completes.
pub trait CompletionModel: Send + Sync {
    fn dimension(&self) -> Option<usize> {
        None
    }

    fn predict(&self, standardized: &[f64]) -> Result<f64, ScoringError>;
}

/// Any thread-safe closure can stand in for a model.
impl<F> CompletionModel for F
where
    F: Fn(&[f64]) -> Result<f64, ScoringError> + Send + Sync,
{
    fn predict(&self, standardized: &[f64]) -> Result<f64, ScoringError> {
        self(standardized)
    }
}

/// Pass-through transform for models trained on raw features.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityStandardizer;

impl Standardizer for IdentityStandardizer {
    fn standardize(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        Ok(features.to_vec())
    }
}
