//! Staffing data model.
//!
//! A system state is a `Vec<ProductionUnit>`. Each unit holds capacity and
//! attendance for the cutting, sewing and finishing departments plus a daily
//! target. The only mutation the optimizer performs is a [`Move`]: one
//! attending worker changes teams inside a single department.
//!
//! Invariants held by every constructed unit:
//!
//! - department workers sum to the unit's total,
//! - `1 <= attendance <= workers` in each department,
//! - `daily_target > 0`.

mod moves;
mod types;
mod validation;

pub use moves::Move;
pub use types::{Department, DepartmentStaff, ProductionUnit, UnitRecord};
pub use validation::{validate_records, ValidationError};
