//! Structural checks applied before any scoring.

use super::types::{Department, ProductionUnit, UnitRecord};
use crate::error::{AllocError, Result};

/// A violated staffing rule for a single unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("sum of department workers ({department_sum}) must equal total_workers ({total_workers})")]
    WorkerSumMismatch {
        department_sum: u32,
        total_workers: u32,
    },

    #[error("{department} attendance ({attendance}) exceeds {department} workers ({workers})")]
    AttendanceExceedsWorkers {
        department: Department,
        attendance: u32,
        workers: u32,
    },

    #[error("{department} attendance must be at least 1")]
    AttendanceBelowMinimum { department: Department },

    #[error("{department} workers must be positive")]
    NoWorkers { department: Department },

    #[error("daily_target must be positive")]
    NoTarget,

    #[error("sum of department workers does not fit in u32")]
    WorkerCountOverflow,
}

/// Converts flat records into validated units.
///
/// Fails on the first offending record, tagging it with its position.
pub fn validate_records(records: &[UnitRecord]) -> Result<Vec<ProductionUnit>> {
    if records.is_empty() {
        return Err(AllocError::EmptySystem);
    }
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            ProductionUnit::try_from(*record)
                .map_err(|source| AllocError::InvalidUnit { index, source })
        })
        .collect()
}
