//! Search results and progress messages.

use std::time::Duration;

use crate::error::Result;
use crate::eval::PerformanceSummary;
use crate::system::{Department, Move, ProductionUnit};

/// Improving moves per department.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MigrationTally {
    pub cutting: usize,
    pub sewing: usize,
    pub finishing: usize,
}

impl MigrationTally {
    pub fn record(&mut self, department: Department) {
        match department {
            Department::Cutting => self.cutting += 1,
            Department::Sewing => self.sewing += 1,
            Department::Finishing => self.finishing += 1,
        }
    }

    pub fn get(&self, department: Department) -> usize {
        match department {
            Department::Cutting => self.cutting,
            Department::Sewing => self.sewing,
            Department::Finishing => self.finishing,
        }
    }

    pub fn total(&self) -> usize {
        self.cutting + self.sewing + self.finishing
    }
}

/// Why the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// Fewer than two units; nothing can move.
    InsufficientUnits,
    /// The draw budget ran out.
    IterationLimit,
    /// Too many consecutive rejections.
    Stalled,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of an allocation search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptimizationResult {
    /// Best system state found.
    pub units: Vec<ProductionUnit>,

    /// Evaluation of the caller's input.
    pub initial: PerformanceSummary,

    /// Evaluation of `units`.
    pub best: PerformanceSummary,

    /// Evaluated moves, including the one that triggered a stop.
    pub iterations: usize,

    /// Moves accepted because they raised the current score.
    pub improving_moves: usize,

    /// Worsening (or neutral) moves accepted by the Metropolis rule.
    pub accepted_worse: usize,

    /// Improving moves per department.
    pub migrations: MigrationTally,

    /// `best.total_output - initial.total_output`.
    pub gain: f64,

    /// Relative change of the completion rate, in percent.
    pub improvement_pct: f64,

    pub final_temperature: f64,

    pub stop_reason: StopReason,

    /// Best completion rate after each evaluated move.
    pub best_history: Vec<f64>,

    pub elapsed: Duration,
}

/// What happened to an evaluated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveOutcome {
    Improved,
    AcceptedWorse,
    Rejected,
}

/// Emitted once per evaluated move.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressUpdate {
    /// 1-based count of evaluated moves so far.
    pub iteration: usize,
    pub best_completion_rate: f64,
    pub current_completion_rate: f64,
    pub last_move: Move,
    pub outcome: MoveOutcome,
}

/// Message sent from a spawned search to its consumer.
#[derive(Debug)]
pub enum ProgressEvent {
    Progress(ProgressUpdate),
    /// Terminal message. Exactly one is sent per spawned search.
    Done(Result<Box<OptimizationResult>>),
}
