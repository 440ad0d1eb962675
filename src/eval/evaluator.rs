//! Model-backed scoring of units and whole systems.

use tracing::trace;

use super::types::{PerformanceSummary, UnitScore};
use crate::error::{AllocError, Result};
use crate::features::build_features;
use crate::model::ModelHandle;
use crate::system::ProductionUnit;

/// Share of the raw rate a unit keeps even when its bottleneck is empty.
pub const BOTTLENECK_FLOOR: f64 = 0.3;

/// Share of the raw rate governed by the bottleneck factor.
pub const BOTTLENECK_WEIGHT: f64 = 0.7;

/// Bottleneck-adjusted rate: `raw_rate * (0.3 + 0.7 * bottleneck_factor)`.
///
/// ```
/// use u_staffing::eval::effective_rate;
///
/// assert_eq!(effective_rate(0.8, 1.0), 0.8);
/// assert_eq!(effective_rate(0.8, 0.0), 0.3 * 0.8);
/// ```
pub fn effective_rate(raw_rate: f64, bottleneck_factor: f64) -> f64 {
    raw_rate * (BOTTLENECK_FLOOR + BOTTLENECK_WEIGHT * bottleneck_factor)
}

/// Scores system states against a [`ModelHandle`].
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'m> {
    model: &'m ModelHandle,
    bottleneck_aware: bool,
}

impl<'m> Evaluator<'m> {
    pub fn new(model: &'m ModelHandle, bottleneck_aware: bool) -> Self {
        Self {
            model,
            bottleneck_aware,
        }
    }

    pub fn bottleneck_aware(&self) -> bool {
        self.bottleneck_aware
    }

    /// Scores one unit. `index` only labels a failure.
    pub fn score_unit(&self, index: usize, unit: &ProductionUnit) -> Result<UnitScore> {
        let features = build_features(unit);
        let raw_rate = self
            .model
            .score(&features)
            .map_err(|source| AllocError::Scoring { index, source })?;

        let (bottleneck, ratio) = unit.bottleneck();
        let (bottleneck_factor, completion_rate) = if self.bottleneck_aware {
            (ratio, effective_rate(raw_rate, ratio))
        } else {
            (1.0, raw_rate)
        };
        let predicted_output = completion_rate * unit.daily_target() as f64;
        trace!(index, raw_rate, completion_rate, "unit scored");

        Ok(UnitScore {
            raw_rate,
            bottleneck_factor,
            bottleneck,
            completion_rate,
            predicted_output,
            daily_target: unit.daily_target(),
        })
    }

    /// Scores every unit and aggregates. Read-only.
    pub fn evaluate(&self, units: &[ProductionUnit]) -> Result<PerformanceSummary> {
        if units.is_empty() {
            return Err(AllocError::EmptySystem);
        }
        let scores = units
            .iter()
            .enumerate()
            .map(|(i, unit)| self.score_unit(i, unit))
            .collect::<Result<Vec<_>>>()?;
        Ok(PerformanceSummary::from_scores(scores))
    }
}

/// Evaluates `units` once; see [`Evaluator::evaluate`].
pub fn evaluate(
    units: &[ProductionUnit],
    model: &ModelHandle,
    bottleneck_aware: bool,
) -> Result<PerformanceSummary> {
    Evaluator::new(model, bottleneck_aware).evaluate(units)
}
