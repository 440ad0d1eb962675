//! Per-unit feature derivation.

use std::fmt;
use std::str::FromStr;

use crate::system::{Department, ProductionUnit};

/// Version of the feature set below. Bump whenever a feature is added,
/// removed or redefined.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// Number of features produced by [`build_features`].
pub const FEATURE_COUNT: usize = 19;

/// A named model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FeatureName {
    TotalWorkers,
    CuttingWorkers,
    SewingWorkers,
    FinishingWorkers,
    CuttingAttendance,
    SewingAttendance,
    FinishingAttendance,
    DailyTarget,
    AttendanceRatioCutting,
    AttendanceRatioSewing,
    AttendanceRatioFinishing,
    OverallAttendanceRatio,
    CuttingWorkerRatio,
    SewingWorkerRatio,
    FinishingWorkerRatio,
    TargetPerWorker,
    CuttingCapacityPressure,
    SewingCapacityPressure,
    FinishingCapacityPressure,
}

/// Canonical feature order. [`UnitFeatures`] stores values in this order.
pub const FEATURE_ORDER: [FeatureName; FEATURE_COUNT] = [
    FeatureName::TotalWorkers,
    FeatureName::CuttingWorkers,
    FeatureName::SewingWorkers,
    FeatureName::FinishingWorkers,
    FeatureName::CuttingAttendance,
    FeatureName::SewingAttendance,
    FeatureName::FinishingAttendance,
    FeatureName::DailyTarget,
    FeatureName::AttendanceRatioCutting,
    FeatureName::AttendanceRatioSewing,
    FeatureName::AttendanceRatioFinishing,
    FeatureName::OverallAttendanceRatio,
    FeatureName::CuttingWorkerRatio,
    FeatureName::SewingWorkerRatio,
    FeatureName::FinishingWorkerRatio,
    FeatureName::TargetPerWorker,
    FeatureName::CuttingCapacityPressure,
    FeatureName::SewingCapacityPressure,
    FeatureName::FinishingCapacityPressure,
];

impl FeatureName {
    /// Position in [`FEATURE_ORDER`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FeatureName::TotalWorkers => "total_workers",
            FeatureName::CuttingWorkers => "cutting_workers",
            FeatureName::SewingWorkers => "sewing_workers",
            FeatureName::FinishingWorkers => "finishing_workers",
            FeatureName::CuttingAttendance => "cutting_attendance",
            FeatureName::SewingAttendance => "sewing_attendance",
            FeatureName::FinishingAttendance => "finishing_attendance",
            FeatureName::DailyTarget => "daily_target",
            FeatureName::AttendanceRatioCutting => "attendance_ratio_cutting",
            FeatureName::AttendanceRatioSewing => "attendance_ratio_sewing",
            FeatureName::AttendanceRatioFinishing => "attendance_ratio_finishing",
            FeatureName::OverallAttendanceRatio => "overall_attendance_ratio",
            FeatureName::CuttingWorkerRatio => "cutting_worker_ratio",
            FeatureName::SewingWorkerRatio => "sewing_worker_ratio",
            FeatureName::FinishingWorkerRatio => "finishing_worker_ratio",
            FeatureName::TargetPerWorker => "target_per_worker",
            FeatureName::CuttingCapacityPressure => "cutting_capacity_pressure",
            FeatureName::SewingCapacityPressure => "sewing_capacity_pressure",
            FeatureName::FinishingCapacityPressure => "finishing_capacity_pressure",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FEATURE_ORDER
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// Feature values of one unit, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitFeatures {
    values: [f64; FEATURE_COUNT],
}

impl UnitFeatures {
    pub fn get(&self, name: FeatureName) -> f64 {
        self.values[name.index()]
    }

    /// Values in [`FEATURE_ORDER`].
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Values rearranged into a model's declared order.
    pub fn ordered(&self, order: &[FeatureName]) -> Vec<f64> {
        order.iter().map(|&name| self.get(name)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FEATURE_ORDER.iter().copied().zip(self.values.iter().copied())
    }
}

/// Derives the model inputs for one unit.
///
/// Total for any constructed [`ProductionUnit`]: every divisor is a positive
/// worker count or an attendance plus one.
pub fn build_features(unit: &ProductionUnit) -> UnitFeatures {
    let total_workers = unit.total_workers() as f64;
    let target = unit.daily_target() as f64;
    let workers = |d: Department| unit.workers(d) as f64;
    let attendance = |d: Department| unit.attendance(d) as f64;
    let pressure = |d: Department| target / (attendance(d) + 1.0);

    use Department::{Cutting, Finishing, Sewing};
    let values = [
        total_workers,
        workers(Cutting),
        workers(Sewing),
        workers(Finishing),
        attendance(Cutting),
        attendance(Sewing),
        attendance(Finishing),
        target,
        unit.attendance_ratio(Cutting),
        unit.attendance_ratio(Sewing),
        unit.attendance_ratio(Finishing),
        unit.total_attendance() as f64 / total_workers,
        workers(Cutting) / total_workers,
        workers(Sewing) / total_workers,
        workers(Finishing) / total_workers,
        target / total_workers,
        pressure(Cutting),
        pressure(Sewing),
        pressure(Finishing),
    ];
    UnitFeatures { values }
}
