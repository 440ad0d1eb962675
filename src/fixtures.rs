//! Shared test fixtures.

use crate::features::{FeatureName, FEATURE_COUNT};
use crate::model::{LinearModel, ModelHandle, StandardScaler};
use crate::system::{DepartmentStaff, ProductionUnit};

/// Linear model rewarding attendance and penalizing capacity pressure.
pub(crate) fn model() -> ModelHandle {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    coefficients[FeatureName::AttendanceRatioCutting.index()] = 0.2;
    coefficients[FeatureName::AttendanceRatioSewing.index()] = 0.2;
    coefficients[FeatureName::AttendanceRatioFinishing.index()] = 0.2;
    coefficients[FeatureName::OverallAttendanceRatio.index()] = 0.1;
    coefficients[FeatureName::CuttingCapacityPressure.index()] = -0.0005;
    coefficients[FeatureName::SewingCapacityPressure.index()] = -0.0005;
    coefficients[FeatureName::FinishingCapacityPressure.index()] = -0.0005;

    ModelHandle::builder()
        .standardizer(StandardScaler::identity(FEATURE_COUNT))
        .model(LinearModel::new(coefficients, 0.3).with_clip(0.05, 1.0))
        .build()
        .expect("fixture model")
}

fn unit(staff: [(u32, u32); 3], target: u32) -> ProductionUnit {
    ProductionUnit::new(
        staff.map(|(workers, attendance)| DepartmentStaff::new(workers, attendance)),
        target,
    )
    .expect("fixture unit")
}

/// The two-team sample from the service smoke test.
pub(crate) fn sample_units() -> Vec<ProductionUnit> {
    vec![
        unit([(10, 9), (15, 14), (5, 4)], 800),
        unit([(8, 7), (12, 11), (5, 5)], 600),
    ]
}

/// Five teams with uneven attendance, leaving room to rebalance.
pub(crate) fn uneven_units() -> Vec<ProductionUnit> {
    vec![
        unit([(10, 9), (15, 14), (5, 4)], 800),
        unit([(8, 7), (12, 11), (5, 5)], 600),
        unit([(6, 2), (10, 9), (4, 1)], 500),
        unit([(7, 7), (9, 4), (6, 6)], 700),
        unit([(5, 3), (8, 8), (5, 2)], 400),
    ]
}
