//! Workforce reallocation for multi-department production lines.
//!
//! Given a set of production teams, each with cutting, sewing and finishing
//! capacity and a partial attendance, the crate searches for the transfer of
//! attending workers between teams that maximizes the predicted system-wide
//! completion rate.
//!
//! - [`system`]: units, staffing invariants and single-worker [`Move`](system::Move)s.
//! - [`features`]: the fixed, versioned feature vector fed to the model.
//! - [`model`]: the external model contract and the injected [`ModelHandle`](model::ModelHandle).
//! - [`eval`]: bottleneck-aware scoring of a whole system.
//! - [`anneal`]: the simulated-annealing search with progress and cancellation.
//!
//! # Features
//!
//! - `serde`: derives for records, summaries and results. The wire-shape
//!   tests in `tests/records.rs` only run with it (`cargo test --features serde`).
//! - `parallel`: multi-start searches on the rayon pool.
//! - `cli`: the `u-staffing` binary.
//!
//! # Example
//!
//! ```
//! use u_staffing::anneal::{AllocationRunner, AnnealingConfig};
//! use u_staffing::model::{IdentityStandardizer, ModelHandle, ScoringError};
//! use u_staffing::system::{validate_records, UnitRecord};
//!
//! let model = ModelHandle::builder()
//!     .feature_names(&["attendance_ratio_cutting", "attendance_ratio_sewing"])
//!     .unwrap()
//!     .standardizer(IdentityStandardizer)
//!     .model(|x: &[f64]| -> Result<f64, ScoringError> { Ok(0.5 * (x[0] + x[1])) })
//!     .build()
//!     .unwrap();
//!
//! let units = validate_records(&[
//!     UnitRecord {
//!         total_workers: 30, cutting_workers: 10, sewing_workers: 15, finishing_workers: 5,
//!         cutting_attendance: 9, sewing_attendance: 14, finishing_attendance: 4,
//!         daily_target: 800,
//!     },
//!     UnitRecord {
//!         total_workers: 25, cutting_workers: 8, sewing_workers: 12, finishing_workers: 5,
//!         cutting_attendance: 7, sewing_attendance: 11, finishing_attendance: 5,
//!         daily_target: 600,
//!     },
//! ])
//! .unwrap();
//!
//! let config = AnnealingConfig::default().with_seed(42);
//! let result = AllocationRunner::run(&model, &units, &config).unwrap();
//! assert!(result.best.completion_rate >= result.initial.completion_rate);
//! ```

pub mod anneal;
pub mod error;
pub mod eval;
pub mod features;
pub mod model;
pub mod system;

#[cfg(test)]
mod fixtures;

pub use error::{AllocError, Result};
