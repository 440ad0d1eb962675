//! System evaluation.
//!
//! Each unit is turned into features, standardized and scored by the model.
//! With the bottleneck adjustment on, the raw prediction is scaled by the
//! unit's lowest department attendance ratio, since a sequential line cannot
//! outrun its slowest stage. Outputs and targets are then summed into a
//! [`PerformanceSummary`].

mod evaluator;
mod types;

pub use evaluator::{effective_rate, evaluate, Evaluator, BOTTLENECK_FLOOR, BOTTLENECK_WEIGHT};
pub(crate) use types::completion_rate;
pub use types::{PerformanceSummary, UnitScore};
