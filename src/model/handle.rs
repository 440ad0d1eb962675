//! Injected, immutable model handle.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::types::{CompletionModel, ScoringError, ScoringStage, Standardizer};
use crate::error::{AllocError, Result};
use crate::features::{FeatureName, UnitFeatures, FEATURE_ORDER, FEATURE_SCHEMA_VERSION};

/// Standardizer, model and declared feature order, assembled once.
///
/// A handle exists only if every part was supplied and the declared
/// dimensions agree, so evaluation never has to check for a missing model.
/// Share it by reference (or `Arc`) across threads; it is never mutated.
pub struct ModelHandle {
    feature_order: Vec<FeatureName>,
    standardizer: Box<dyn Standardizer>,
    model: Box<dyn CompletionModel>,
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("feature_order", &self.feature_order)
            .finish_non_exhaustive()
    }
}

impl ModelHandle {
    pub fn builder() -> ModelHandleBuilder {
        ModelHandleBuilder::default()
    }

    pub fn feature_order(&self) -> &[FeatureName] {
        &self.feature_order
    }

    /// Raw completion rate for one unit's features.
    pub fn score(&self, features: &UnitFeatures) -> std::result::Result<f64, ScoringError> {
        let expected = self.feature_order.len();
        let input = features.ordered(&self.feature_order);

        let standardized = self.standardizer.standardize(&input)?;
        if standardized.len() != expected {
            return Err(ScoringError::DimensionMismatch {
                stage: ScoringStage::Standardize,
                expected,
                actual: standardized.len(),
            });
        }
        if standardized.iter().any(|v| !v.is_finite()) {
            return Err(ScoringError::NonFinite {
                stage: ScoringStage::Standardize,
            });
        }

        let raw = self.model.predict(&standardized)?;
        if !raw.is_finite() {
            return Err(ScoringError::NonFinite {
                stage: ScoringStage::Predict,
            });
        }
        Ok(raw)
    }
}

/// Builder for [`ModelHandle`].
///
/// # Examples
///
/// ```
/// use u_staffing::model::{IdentityStandardizer, ModelHandle, ScoringError};
///
/// let handle = ModelHandle::builder()
///     .standardizer(IdentityStandardizer)
///     .model(|_: &[f64]| -> Result<f64, ScoringError> { Ok(0.9) })
///     .build()
///     .unwrap();
/// assert_eq!(handle.feature_order().len(), 19);
/// ```
#[derive(Default)]
pub struct ModelHandleBuilder {
    feature_order: Option<Vec<FeatureName>>,
    schema_version: Option<u32>,
    standardizer: Option<Box<dyn Standardizer>>,
    model: Option<Box<dyn CompletionModel>>,
}

impl ModelHandleBuilder {
    /// Declares the order the model expects. Defaults to the canonical order.
    pub fn feature_order(mut self, order: Vec<FeatureName>) -> Self {
        self.feature_order = Some(order);
        self
    }

    /// Declares the order by feature name, as stored next to a trained model.
    pub fn feature_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        let order = names
            .iter()
            .map(|n| n.as_ref().parse::<FeatureName>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AllocError::ModelUnavailable)?;
        self.feature_order = Some(order);
        Ok(self)
    }

    /// Feature schema version the model was trained against.
    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = Some(version);
        self
    }

    pub fn standardizer<S: Standardizer + 'static>(mut self, standardizer: S) -> Self {
        self.standardizer = Some(Box::new(standardizer));
        self
    }

    pub fn model<M: CompletionModel + 'static>(mut self, model: M) -> Self {
        self.model = Some(Box::new(model));
        self
    }

    pub fn build(self) -> Result<ModelHandle> {
        let standardizer = self
            .standardizer
            .ok_or_else(|| AllocError::ModelUnavailable("standardizer not loaded".into()))?;
        let model = self
            .model
            .ok_or_else(|| AllocError::ModelUnavailable("model not loaded".into()))?;

        if let Some(version) = self.schema_version {
            if version != FEATURE_SCHEMA_VERSION {
                return Err(AllocError::ModelUnavailable(format!(
                    "model expects feature schema v{version}, builder provides v{FEATURE_SCHEMA_VERSION}"
                )));
            }
        }

        let feature_order = self.feature_order.unwrap_or_else(|| FEATURE_ORDER.to_vec());
        if feature_order.is_empty() {
            return Err(AllocError::ModelUnavailable("feature order is empty".into()));
        }
        let mut seen = HashSet::with_capacity(feature_order.len());
        for name in &feature_order {
            if !seen.insert(*name) {
                return Err(AllocError::ModelUnavailable(format!(
                    "feature '{name}' listed twice"
                )));
            }
        }

        for (part, dim) in [("standardizer", standardizer.dimension()), ("model", model.dimension())] {
            if let Some(dim) = dim {
                if dim != feature_order.len() {
                    return Err(AllocError::ModelUnavailable(format!(
                        "{part} expects {dim} features, feature order declares {}",
                        feature_order.len()
                    )));
                }
            }
        }

        debug!(features = feature_order.len(), "model handle ready");
        Ok(ModelHandle {
            feature_order,
            standardizer,
            model,
        })
    }
}
