//! Evaluation results.

use crate::system::Department;

/// Score of a single unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitScore {
    /// Model prediction before the bottleneck adjustment.
    pub raw_rate: f64,
    /// Lowest department attendance ratio (1.0 when the adjustment is off).
    pub bottleneck_factor: f64,
    /// Department holding the lowest attendance ratio.
    pub bottleneck: Department,
    /// Effective completion rate.
    pub completion_rate: f64,
    /// `completion_rate * daily_target`.
    pub predicted_output: f64,
    pub daily_target: u32,
}

/// Aggregate performance of a system state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceSummary {
    /// Per-unit scores, in input order.
    pub units: Vec<UnitScore>,
    pub total_output: f64,
    pub total_target: u64,
    /// `total_output / total_target`.
    pub completion_rate: f64,
}

impl PerformanceSummary {
    /// Aggregates unit scores. Summation runs in slice order so equal inputs
    /// give bit-identical totals.
    pub fn from_scores(units: Vec<UnitScore>) -> Self {
        let (total_output, total_target) = totals(&units);
        let completion_rate = rate(total_output, total_target);
        Self {
            units,
            total_output,
            total_target,
            completion_rate,
        }
    }
}

/// Summed predicted output and target, in slice order.
pub(crate) fn totals(scores: &[UnitScore]) -> (f64, u64) {
    let mut total_output = 0.0;
    let mut total_target = 0u64;
    for score in scores {
        total_output += score.predicted_output;
        total_target += u64::from(score.daily_target);
    }
    (total_output, total_target)
}

pub(crate) fn rate(total_output: f64, total_target: u64) -> f64 {
    if total_target == 0 {
        0.0
    } else {
        total_output / total_target as f64
    }
}

/// System completion rate of a score slice, identical to
/// [`PerformanceSummary::from_scores`] over the same slice.
pub(crate) fn completion_rate(scores: &[UnitScore]) -> f64 {
    let (total_output, total_target) = totals(scores);
    rate(total_output, total_target)
}
