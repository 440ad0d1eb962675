//! Error taxonomy shared by evaluation and optimization.
//!
//! Input that breaks a staffing invariant, a misbehaving scoring model and a
//! missing model are distinct variants so callers can map each to its own
//! response. Having fewer than two units is not an error; the optimizer
//! reports it through [`StopReason::InsufficientUnits`](crate::anneal::StopReason).

use crate::model::ScoringError;
use crate::system::ValidationError;

/// Errors returned by [`evaluate`](crate::eval::evaluate) and the
/// [`AllocationRunner`](crate::anneal::AllocationRunner) entry points.
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    /// A supplied unit violates a staffing invariant.
    #[error("unit {}: {source}", .index + 1)]
    InvalidUnit {
        /// Zero-based position of the offending unit in the input.
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// No units were supplied.
    #[error("at least one production unit is required")]
    EmptySystem,

    /// The external model or its standardization transform failed.
    #[error("scoring failed for unit {}: {source}", .index + 1)]
    Scoring {
        index: usize,
        #[source]
        source: ScoringError,
    },

    /// The model handle could not be assembled.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Optimizer parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A spawned optimization thread ended without sending its result.
    #[error("optimization worker exited without delivering a result")]
    WorkerLost,
}

impl AllocError {
    /// `true` for input problems the caller can fix by editing the units.
    pub fn is_validation(&self) -> bool {
        matches!(self, AllocError::InvalidUnit { .. } | AllocError::EmptySystem)
    }

    /// `true` when the scoring model misbehaved.
    pub fn is_scoring(&self) -> bool {
        matches!(self, AllocError::Scoring { .. })
    }
}

pub type Result<T> = std::result::Result<T, AllocError>;
