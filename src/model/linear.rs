//! Reference implementations of the model contract.
//!
//! A z-score scaler and a clipped linear regressor. Production deployments
//! plug their own trained model in through [`CompletionModel`]; these two
//! cover tests, benchmarks and the command-line smoke run.

use super::types::{CompletionModel, ScoringError, ScoringStage, Standardizer};

/// Z-score standardization: `(x - mean) / scale`.
///
/// A zero scale is treated as one so constant features pass through centred.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Zero mean, unit scale over `n` features.
    pub fn identity(n: usize) -> Self {
        Self {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }
}

impl Standardizer for StandardScaler {
    fn dimension(&self) -> Option<usize> {
        Some(self.mean.len())
    }

    fn standardize(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        if features.len() != self.mean.len() || self.scale.len() != self.mean.len() {
            return Err(ScoringError::DimensionMismatch {
                stage: ScoringStage::Standardize,
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| {
                let s = if *s == 0.0 { 1.0 } else { *s };
                (x - m) / s
            })
            .collect())
    }
}

/// `intercept + coefficients . x`, optionally clipped to `[lo, hi]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub clip: Option<(f64, f64)>,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            clip: None,
        }
    }

    pub fn with_clip(mut self, lo: f64, hi: f64) -> Self {
        self.clip = Some((lo, hi));
        self
    }
}

impl CompletionModel for LinearModel {
    fn dimension(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn predict(&self, standardized: &[f64]) -> Result<f64, ScoringError> {
        if standardized.len() != self.coefficients.len() {
            return Err(ScoringError::DimensionMismatch {
                stage: ScoringStage::Predict,
                expected: self.coefficients.len(),
                actual: standardized.len(),
            });
        }
        let y = self.intercept
            + self
                .coefficients
                .iter()
                .zip(standardized)
                .map(|(c, x)| c * x)
                .sum::<f64>();
        Ok(match self.clip {
            Some((lo, hi)) => y.clamp(lo, hi),
            None => y,
        })
    }
}
