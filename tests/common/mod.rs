use u_staffing::features::{FeatureName, FEATURE_COUNT};
use u_staffing::model::{LinearModel, ModelHandle, StandardScaler};
use u_staffing::system::{Department, DepartmentStaff, ProductionUnit};

pub fn model() -> ModelHandle {
    let mut coefficients = vec![0.0; FEATURE_COUNT];
    for name in [
        FeatureName::AttendanceRatioCutting,
        FeatureName::AttendanceRatioSewing,
        FeatureName::AttendanceRatioFinishing,
    ] {
        coefficients[name.index()] = 0.2;
    }
    coefficients[FeatureName::OverallAttendanceRatio.index()] = 0.1;
    for name in [
        FeatureName::CuttingCapacityPressure,
        FeatureName::SewingCapacityPressure,
        FeatureName::FinishingCapacityPressure,
    ] {
        coefficients[name.index()] = -0.0005;
    }
    ModelHandle::builder()
        .standardizer(StandardScaler::identity(FEATURE_COUNT))
        .model(LinearModel::new(coefficients, 0.3).with_clip(0.05, 1.0))
        .build()
        .unwrap()
}

pub fn unit(staff: [(u32, u32); 3], target: u32) -> ProductionUnit {
    ProductionUnit::new(staff.map(|(w, a)| DepartmentStaff::new(w, a)), target).unwrap()
}

pub fn sample_units() -> Vec<ProductionUnit> {
    vec![
        unit([(10, 9), (15, 14), (5, 4)], 800),
        unit([(8, 7), (12, 11), (5, 5)], 600),
    ]
}

pub fn attendance_totals(units: &[ProductionUnit]) -> [u32; 3] {
    Department::ALL.map(|d| units.iter().map(|u| u.attendance(d)).sum::<u32>())
}
