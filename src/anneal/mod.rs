//! Simulated annealing over worker transfers.
//!
//! The search state is a copy of the caller's units. Each step moves one
//! attending worker between two teams inside one department, re-scores the
//! two teams and applies the Metropolis rule: improvements are always kept,
//! a worsening of `delta` survives with probability `exp(delta / T)`. The
//! temperature cools geometrically and the best state ever seen is
//! snapshotted, so the reported best never falls below the input.
//!
//! The loop is sequential. Independent runs share nothing but the read-only
//! [`ModelHandle`](crate::model::ModelHandle) and can run side by side, see
//! [`AllocationRunner::run_multi_start`] and [`spawn`].
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast Computing Machines"

mod config;
mod progress;
mod runner;
mod types;

pub use config::AnnealingConfig;
pub use progress::{spawn, FnSink, NoProgress, OptimizationHandle, ProgressSink};
pub use runner::{optimize, optimize_with_progress, AllocationRunner};
pub use types::{
    MigrationTally, MoveOutcome, OptimizationResult, ProgressEvent, ProgressUpdate, StopReason,
};
