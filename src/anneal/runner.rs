//! Annealing loop.
//!
//! # Algorithm
//!
//! 1. Copy the input into a working state and score it.
//! 2. For each draw:
//!    a. pick a department and two distinct units at random,
//!    b. skip the draw if the transfer is illegal,
//!    c. apply it and re-score the two touched units,
//!    d. keep it if the score rose, otherwise keep it with probability
//!       `exp(delta / T)` and undo it on rejection,
//!    e. cool `T` and stop early after too many consecutive rejections.
//! 3. Re-evaluate the untouched input and report the best state seen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::config::AnnealingConfig;
use super::progress::{NoProgress, ProgressSink};
use super::types::{
    MigrationTally, MoveOutcome, OptimizationResult, ProgressUpdate, StopReason,
};
use crate::error::{AllocError, Result};
use crate::eval::{completion_rate, Evaluator, PerformanceSummary};
use crate::model::ModelHandle;
use crate::system::{Department, Move, ProductionUnit};

/// Executes the allocation search.
pub struct AllocationRunner;

impl AllocationRunner {
    /// Runs the search with an RNG seeded from `config.seed`.
    pub fn run(
        model: &ModelHandle,
        units: &[ProductionUnit],
        config: &AnnealingConfig,
    ) -> Result<OptimizationResult> {
        Self::run_with_cancel(model, units, config, None)
    }

    /// Runs the search with an optional cancellation flag.
    ///
    /// The flag is checked before every draw; a cancelled run still returns
    /// the best state found so far.
    pub fn run_with_cancel(
        model: &ModelHandle,
        units: &[ProductionUnit],
        config: &AnnealingConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizationResult> {
        let mut rng = create_rng(config.seed);
        search(model, units, config, &mut rng, &mut NoProgress, cancel.as_deref())
    }

    /// Runs the search with a caller-owned random source. `config.seed` is
    /// ignored.
    pub fn run_with_rng<R: Rng + ?Sized>(
        model: &ModelHandle,
        units: &[ProductionUnit],
        config: &AnnealingConfig,
        rng: &mut R,
    ) -> Result<OptimizationResult> {
        search(model, units, config, rng, &mut NoProgress, None)
    }

    /// Runs the search, reporting every evaluated move to `sink`.
    pub fn run_with_progress<S: ProgressSink + ?Sized>(
        model: &ModelHandle,
        units: &[ProductionUnit],
        config: &AnnealingConfig,
        sink: &mut S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<OptimizationResult> {
        let mut rng = create_rng(config.seed);
        search(model, units, config, &mut rng, sink, cancel.as_deref())
    }

    /// Runs one independent search per seed and keeps the best.
    ///
    /// With the `parallel` feature the searches run on the rayon pool. Ties
    /// go to the earliest seed. An empty `seeds` slice falls back to a single
    /// [`run`](Self::run).
    pub fn run_multi_start(
        model: &ModelHandle,
        units: &[ProductionUnit],
        config: &AnnealingConfig,
        seeds: &[u64],
    ) -> Result<OptimizationResult> {
        if seeds.is_empty() {
            return Self::run(model, units, config);
        }

        let run_seed = |&seed: &u64| Self::run(model, units, &config.clone().with_seed(seed));
        #[cfg(feature = "parallel")]
        let results: Vec<Result<OptimizationResult>> = seeds.par_iter().map(run_seed).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<OptimizationResult>> = seeds.iter().map(run_seed).collect();

        let mut best: Option<OptimizationResult> = None;
        for result in results {
            let result = result?;
            let better = best
                .as_ref()
                .is_none_or(|b| result.best.completion_rate > b.best.completion_rate);
            if better {
                best = Some(result);
            }
        }
        info!(starts = seeds.len(), "multi-start search finished");
        best.ok_or(AllocError::EmptySystem)
    }
}

/// Searches from `units` using the caller's model; see [`AllocationRunner::run`].
pub fn optimize(
    units: &[ProductionUnit],
    model: &ModelHandle,
    config: &AnnealingConfig,
) -> Result<OptimizationResult> {
    AllocationRunner::run(model, units, config)
}

/// Like [`optimize`], reporting every evaluated move to `sink`.
pub fn optimize_with_progress<S: ProgressSink + ?Sized>(
    units: &[ProductionUnit],
    model: &ModelHandle,
    config: &AnnealingConfig,
    sink: &mut S,
) -> Result<OptimizationResult> {
    AllocationRunner::run_with_progress(model, units, config, sink, None)
}

fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

/// Draws a department and an ordered pair of distinct unit indices.
fn draw_move<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Move {
    let department = Department::ALL[rng.random_range(0..Department::ALL.len())];
    let from = rng.random_range(0..n);
    let mut to = rng.random_range(0..n - 1);
    if to >= from {
        to += 1;
    }
    Move::new(department, from, to)
}

fn search<R, S>(
    model: &ModelHandle,
    units: &[ProductionUnit],
    config: &AnnealingConfig,
    rng: &mut R,
    sink: &mut S,
    cancel: Option<&AtomicBool>,
) -> Result<OptimizationResult>
where
    R: Rng + ?Sized,
    S: ProgressSink + ?Sized,
{
    config.validate().map_err(AllocError::InvalidConfig)?;
    let started = Instant::now();
    let evaluator = Evaluator::new(model, config.bottleneck_aware);

    // Working copy; the caller's slice is only read.
    let mut current = units.to_vec();
    let start = evaluator.evaluate(&current)?;
    let mut scores = start.units.clone();
    let mut current_score = start.completion_rate;
    let mut best_units = current.clone();
    let mut best = start;

    let n = current.len();
    let mut temperature = config.initial_temperature;
    let mut iterations = 0usize;
    let mut improving_moves = 0usize;
    let mut accepted_worse = 0usize;
    let mut stall = 0usize;
    let mut migrations = MigrationTally::default();
    let mut best_history = Vec::new();

    info!(
        units = n,
        max_iterations = config.max_iterations,
        initial_rate = current_score,
        "allocation search started"
    );

    let mut stop_reason = StopReason::IterationLimit;
    if n < 2 {
        stop_reason = StopReason::InsufficientUnits;
    } else {
        for _ in 0..config.max_iterations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                stop_reason = StopReason::Cancelled;
                break;
            }

            let mv = draw_move(rng, n);
            if !mv.apply(&mut current) {
                continue;
            }

            let previous = (scores[mv.from], scores[mv.to]);
            scores[mv.from] = evaluator.score_unit(mv.from, &current[mv.from])?;
            scores[mv.to] = evaluator.score_unit(mv.to, &current[mv.to])?;
            let new_score = completion_rate(&scores);
            let delta = new_score - current_score;
            iterations += 1;

            let outcome = if delta > 0.0 {
                current_score = new_score;
                improving_moves += 1;
                migrations.record(mv.department);
                stall = 0;
                if new_score > best.completion_rate {
                    best_units.clone_from(&current);
                    best = PerformanceSummary::from_scores(scores.clone());
                    debug!(iteration = iterations, rate = new_score, "new best allocation");
                }
                MoveOutcome::Improved
            } else if rng.random::<f64>() < (delta / temperature).exp() {
                current_score = new_score;
                accepted_worse += 1;
                stall = 0;
                MoveOutcome::AcceptedWorse
            } else {
                mv.inverse().apply(&mut current);
                scores[mv.from] = previous.0;
                scores[mv.to] = previous.1;
                stall += 1;
                MoveOutcome::Rejected
            };

            temperature *= config.cooling_rate;
            best_history.push(best.completion_rate);
            trace!(iteration = iterations, ?mv, ?outcome, delta, temperature, "move evaluated");
            sink.report(ProgressUpdate {
                iteration: iterations,
                best_completion_rate: best.completion_rate,
                current_completion_rate: current_score,
                last_move: mv,
                outcome,
            });

            if stall > config.stall_limit {
                stop_reason = StopReason::Stalled;
                break;
            }
        }
    }

    // Scored afresh from the caller's slice, independent of the working copy.
    let initial = evaluator.evaluate(units)?;
    let gain = best.total_output - initial.total_output;
    let improvement_pct = if initial.completion_rate > 0.0 {
        (best.completion_rate / initial.completion_rate - 1.0) * 100.0
    } else {
        0.0
    };

    info!(
        iterations,
        improving_moves,
        ?stop_reason,
        initial_rate = initial.completion_rate,
        best_rate = best.completion_rate,
        improvement_pct,
        "allocation search finished"
    );

    Ok(OptimizationResult {
        units: best_units,
        initial,
        best,
        iterations,
        improving_moves,
        accepted_worse,
        migrations,
        gain,
        improvement_pct,
        final_temperature: temperature,
        stop_reason,
        best_history,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::fixtures;
    use crate::model::{IdentityStandardizer, ScoringError};
    use crate::system::DepartmentStaff;

    fn attendance_totals(units: &[ProductionUnit]) -> [u32; 3] {
        Department::ALL.map(|d| units.iter().map(|u| u.attendance(d)).sum::<u32>())
    }

    #[test]
    fn test_sample_never_regresses() {
        let model = fixtures::model();
        let units = fixtures::sample_units();
        let config = AnnealingConfig::default().with_max_iterations(1000).with_seed(42);

        let result = AllocationRunner::run(&model, &units, &config).unwrap();

        assert_eq!(result.initial.total_target, 1400);
        assert!(result.best.completion_rate >= result.initial.completion_rate);
        assert!(result.gain >= 0.0);
        assert!(result.improvement_pct >= 0.0);
        assert_eq!(units, fixtures::sample_units());
    }

    #[test]
    fn test_best_matches_fresh_evaluation() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(9);
        let result = AllocationRunner::run(&model, &fixtures::uneven_units(), &config).unwrap();

        let fresh = evaluate(&result.units, &model, true).unwrap();
        assert_eq!(fresh, result.best);
        let initial = evaluate(&fixtures::uneven_units(), &model, true).unwrap();
        assert_eq!(initial, result.initial);
    }

    #[test]
    fn test_uneven_system_improves() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(1).with_max_iterations(3000);
        let result = AllocationRunner::run(&model, &fixtures::uneven_units(), &config).unwrap();

        assert!(result.best.completion_rate > result.initial.completion_rate);
        assert!(result.improving_moves > 0);
        assert_eq!(result.migrations.total(), result.improving_moves);
        assert!(result.gain > 0.0);
    }

    #[test]
    fn test_attendance_conserved() {
        let model = fixtures::model();
        let units = fixtures::uneven_units();
        let config = AnnealingConfig::default().with_seed(17);
        let result = AllocationRunner::run(&model, &units, &config).unwrap();

        assert_eq!(attendance_totals(&result.units), attendance_totals(&units));
        for (before, after) in units.iter().zip(&result.units) {
            for d in Department::ALL {
                assert_eq!(before.workers(d), after.workers(d));
                assert!(after.attendance(d) >= 1 && after.attendance(d) <= after.workers(d));
            }
        }
    }

    #[test]
    fn test_best_history_non_decreasing() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(23).with_max_iterations(2000);
        let result = AllocationRunner::run(&model, &fixtures::uneven_units(), &config).unwrap();

        assert_eq!(result.best_history.len(), result.iterations);
        for window in result.best_history.windows(2) {
            assert!(window[1] >= window[0], "best regressed: {} < {}", window[1], window[0]);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(1234);
        let units = fixtures::uneven_units();

        let mut moves_a: Vec<ProgressUpdate> = Vec::new();
        let mut moves_b: Vec<ProgressUpdate> = Vec::new();
        let a = AllocationRunner::run_with_progress(&model, &units, &config, &mut moves_a, None)
            .unwrap();
        let b = AllocationRunner::run_with_progress(&model, &units, &config, &mut moves_b, None)
            .unwrap();

        assert_eq!(moves_a, moves_b);
        assert_eq!(a.units, b.units);
        assert_eq!(a.iterations, b.iterations);
        assert_eq!(a.best, b.best);
    }

    #[test]
    fn test_run_with_rng_matches_seed() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(77);
        let units = fixtures::uneven_units();

        let seeded = AllocationRunner::run(&model, &units, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        let explicit = AllocationRunner::run_with_rng(&model, &units, &config, &mut rng).unwrap();
        assert_eq!(seeded.units, explicit.units);
        assert_eq!(seeded.best_history, explicit.best_history);
    }

    #[test]
    fn test_single_unit_is_noop() {
        let model = fixtures::model();
        let units = vec![fixtures::sample_units().remove(0)];
        let config = AnnealingConfig::default().with_seed(1);
        let result = AllocationRunner::run(&model, &units, &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::InsufficientUnits);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.migrations.total(), 0);
        assert_eq!(result.units, units);
        assert_eq!(result.best, result.initial);
        assert_eq!(result.gain, 0.0);
        assert_eq!(result.improvement_pct, 0.0);
    }

    #[test]
    fn test_no_legal_moves_exhausts_budget() {
        // Every department at minimum attendance: nothing can leave.
        let unit = ProductionUnit::new(
            [
                DepartmentStaff::new(3, 1),
                DepartmentStaff::new(3, 1),
                DepartmentStaff::new(3, 1),
            ],
            100,
        )
        .unwrap();
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(2).with_max_iterations(50);
        let result = AllocationRunner::run(&model, &[unit.clone(), unit], &config).unwrap();

        assert_eq!(result.iterations, 0);
        assert_eq!(result.stop_reason, StopReason::IterationLimit);
        // skipped draws never cool
        assert_eq!(result.final_temperature, config.initial_temperature);
    }

    #[test]
    fn test_stall_limit_stops_early() {
        let model = fixtures::model();
        let config = AnnealingConfig::default()
            .with_seed(4)
            .with_initial_temperature(1e-9)
            .with_stall_limit(5)
            .with_max_iterations(100_000);
        let result = AllocationRunner::run(&model, &fixtures::uneven_units(), &config).unwrap();

        assert_eq!(result.stop_reason, StopReason::Stalled);
        assert!(result.iterations < 100_000);
    }

    #[test]
    fn test_stall_counts_consecutive_rejections() {
        let model = fixtures::model();
        let config = AnnealingConfig::default()
            .with_seed(31)
            .with_initial_temperature(2.0)
            .with_cooling_rate(0.9)
            .with_stall_limit(3)
            .with_max_iterations(100_000);
        let mut updates: Vec<ProgressUpdate> = Vec::new();
        let result = AllocationRunner::run_with_progress(
            &model,
            &fixtures::uneven_units(),
            &config,
            &mut updates,
            None,
        )
        .unwrap();

        assert_eq!(result.stop_reason, StopReason::Stalled);
        assert_eq!(updates.len(), result.iterations);
        assert!(result.accepted_worse > 0);

        // Rejections advance the counter, any accepted move resets it.
        let mut stall = 0;
        for (i, update) in updates.iter().enumerate() {
            stall = match update.outcome {
                MoveOutcome::Rejected => stall + 1,
                MoveOutcome::Improved | MoveOutcome::AcceptedWorse => 0,
            };
            if i + 1 < updates.len() {
                assert!(stall <= config.stall_limit, "search ran past the stall limit at {i}");
            }
        }
        assert_eq!(stall, config.stall_limit + 1);
        let tail = &updates[updates.len() - (config.stall_limit + 1)..];
        assert!(tail.iter().all(|u| u.outcome == MoveOutcome::Rejected));
    }

    #[test]
    fn test_accepted_worse_resets_stall() {
        // Hot enough to accept nearly every worsening move, so the search
        // cannot stall before the budget runs out.
        let model = fixtures::model();
        let config = AnnealingConfig::default()
            .with_seed(12)
            .with_initial_temperature(1e6)
            .with_cooling_rate(1.0)
            .with_stall_limit(0)
            .with_max_iterations(200);
        let mut updates: Vec<ProgressUpdate> = Vec::new();
        let result = AllocationRunner::run_with_progress(
            &model,
            &fixtures::uneven_units(),
            &config,
            &mut updates,
            None,
        )
        .unwrap();

        let worse = updates
            .iter()
            .filter(|u| u.outcome == MoveOutcome::AcceptedWorse)
            .count();
        assert_eq!(worse, result.accepted_worse);
        assert!(worse > 0);
        if result.stop_reason == StopReason::Stalled {
            assert_eq!(updates.last().map(|u| u.outcome), Some(MoveOutcome::Rejected));
            assert!(updates[..updates.len() - 1]
                .iter()
                .all(|u| u.outcome != MoveOutcome::Rejected));
        } else {
            assert_eq!(result.stop_reason, StopReason::IterationLimit);
            assert!(updates.iter().all(|u| u.outcome != MoveOutcome::Rejected));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_initial_temperature(-1.0);
        let err = AllocationRunner::run(&model, &fixtures::sample_units(), &config).unwrap_err();
        assert!(matches!(err, AllocError::InvalidConfig(_)));
    }

    #[test]
    fn test_cancelled_before_first_draw() {
        let model = fixtures::model();
        let config = AnnealingConfig::default().with_seed(8);
        let cancel = Arc::new(AtomicBool::new(true));
        let result = AllocationRunner::run_with_cancel(
            &model,
            &fixtures::uneven_units(),
            &config,
            Some(cancel),
        )
        .unwrap();

        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.units, fixtures::uneven_units());
    }

    #[test]
    fn test_scoring_failure_aborts_search() {
        use std::sync::atomic::AtomicUsize;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let model = ModelHandle::builder()
            .standardizer(IdentityStandardizer)
            .model(move |_: &[f64]| -> std::result::Result<f64, ScoringError> {
                // initial evaluation succeeds, the first move fails
                if counter.fetch_add(1, Ordering::Relaxed) < 5 {
                    Ok(0.8)
                } else {
                    Err(ScoringError::Model("model crashed".into()))
                }
            })
            .build()
            .unwrap();
        let config = AnnealingConfig::default().with_seed(3);
        let err = AllocationRunner::run(&model, &fixtures::uneven_units(), &config).unwrap_err();
        assert!(err.is_scoring());
    }

    #[test]
    fn test_multi_start_keeps_best() {
        let model = fixtures::model();
        let units = fixtures::uneven_units();
        let config = AnnealingConfig::default().with_max_iterations(500);
        let seeds = [1, 2, 3, 4];

        let best = AllocationRunner::run_multi_start(&model, &units, &config, &seeds).unwrap();
        for seed in seeds {
            let single =
                AllocationRunner::run(&model, &units, &config.clone().with_seed(seed)).unwrap();
            assert!(best.best.completion_rate >= single.best.completion_rate);
        }
    }

    #[test]
    fn test_draw_move_distinct_indices() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            let mv = draw_move(&mut rng, 3);
            assert_ne!(mv.from, mv.to);
            assert!(mv.from < 3 && mv.to < 3);
        }
    }
}
