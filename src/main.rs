//! Command-line driver: load teams and a linear model, run the search and
//! print a JSON report.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use u_staffing::anneal::{self, AllocationRunner, AnnealingConfig};
use u_staffing::features::{FeatureName, FEATURE_SCHEMA_VERSION};
use u_staffing::model::{LinearModel, ModelHandle, StandardScaler};
use u_staffing::system::{validate_records, Department, UnitRecord};

#[derive(Parser, Debug)]
#[command(name = "u-staffing", about = "Reallocate attending workers across production teams")]
struct Cli {
    /// JSON file with `{"teams": [...]}` records
    #[arg(long, conflicts_with = "sample")]
    teams: Option<PathBuf>,

    /// Use the built-in two-team sample instead of --teams
    #[arg(long)]
    sample: bool,

    /// JSON file with feature order, scaler and linear coefficients
    #[arg(long)]
    model: PathBuf,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1000)]
    iterations: usize,

    #[arg(long, default_value_t = 2.0)]
    temperature: f64,

    #[arg(long, default_value_t = 0.995)]
    cooling_rate: f64,

    #[arg(long, default_value_t = 200)]
    stall_limit: usize,

    /// Score with the raw model prediction only
    #[arg(long)]
    no_bottleneck: bool,

    /// Independent restarts seeded `seed, seed + 1, ...` (random base when
    /// --seed is absent); the best one is reported
    #[arg(long, default_value_t = 1)]
    restarts: u64,

    /// Log progress while the search runs
    #[arg(long, conflicts_with = "restarts")]
    progress: bool,
}

#[derive(Deserialize)]
struct TeamsFile {
    teams: Vec<UnitRecord>,
}

#[derive(Deserialize)]
struct ModelFile {
    #[serde(default)]
    schema_version: Option<u32>,
    feature_order: Vec<FeatureName>,
    scaler: StandardScaler,
    model: LinearModel,
}

#[derive(Serialize)]
struct Metrics {
    completion_rate: f64,
    total_output: f64,
    total_target: u64,
}

#[derive(Serialize)]
struct Report {
    initial: Metrics,
    #[serde(rename = "final")]
    final_: Metrics,
    teams_before: Vec<UnitRecord>,
    teams_after: Vec<UnitRecord>,
    iterations: usize,
    migrations: usize,
    accepted_worse: usize,
    improvement_pct: f64,
    gain: f64,
    computation_time: f64,
    migration_log: BTreeMap<&'static str, usize>,
    stop_reason: anneal::StopReason,
}

fn sample_teams() -> Vec<UnitRecord> {
    vec![
        UnitRecord {
            total_workers: 30,
            cutting_workers: 10,
            sewing_workers: 15,
            finishing_workers: 5,
            cutting_attendance: 9,
            sewing_attendance: 14,
            finishing_attendance: 4,
            daily_target: 800,
        },
        UnitRecord {
            total_workers: 25,
            cutting_workers: 8,
            sewing_workers: 12,
            finishing_workers: 5,
            cutting_attendance: 7,
            sewing_attendance: 11,
            finishing_attendance: 5,
            daily_target: 600,
        },
    ]
}

fn load_model(path: &Path) -> anyhow::Result<ModelHandle> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading model file {}", path.display()))?;
    let file: ModelFile = serde_json::from_str(&raw).context("parsing model file")?;
    let mut builder = ModelHandle::builder()
        .feature_order(file.feature_order)
        .standardizer(file.scaler)
        .model(file.model);
    if let Some(version) = file.schema_version {
        builder = builder.schema_version(version);
    }
    Ok(builder.build()?)
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let started = Instant::now();

    let records = match (&cli.teams, cli.sample) {
        (Some(path), _) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading teams file {}", path.display()))?;
            serde_json::from_str::<TeamsFile>(&raw)
                .context("parsing teams file")?
                .teams
        }
        (None, true) => sample_teams(),
        (None, false) => bail!("either --teams or --sample is required"),
    };
    let units = validate_records(&records)?;

    let model = Arc::new(load_model(&cli.model)?);
    info!(schema = FEATURE_SCHEMA_VERSION, teams = units.len(), "inputs loaded");

    let mut config = AnnealingConfig::default()
        .with_max_iterations(cli.iterations)
        .with_initial_temperature(cli.temperature)
        .with_cooling_rate(cli.cooling_rate)
        .with_stall_limit(cli.stall_limit)
        .with_bottleneck_aware(!cli.no_bottleneck);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let result = if cli.restarts > 1 {
        let base = cli.seed.unwrap_or_else(rand::random);
        info!(base_seed = base, restarts = cli.restarts, "multi-start");
        let seeds: Vec<u64> = (0..cli.restarts).map(|i| base.wrapping_add(i)).collect();
        AllocationRunner::run_multi_start(&model, &units, &config, &seeds)?
    } else if cli.progress {
        let handle = anneal::spawn(Arc::clone(&model), units.clone(), config);
        handle.wait_with(|update| {
            if update.iteration % 100 == 0 {
                info!(
                    iteration = update.iteration,
                    best = update.best_completion_rate,
                    "progress"
                );
            }
        })?
    } else {
        AllocationRunner::run(&model, &units, &config)?
    };

    let report = Report {
        initial: Metrics {
            completion_rate: result.initial.completion_rate,
            total_output: result.initial.total_output,
            total_target: result.initial.total_target,
        },
        final_: Metrics {
            completion_rate: result.best.completion_rate,
            total_output: result.best.total_output,
            total_target: result.best.total_target,
        },
        teams_before: records,
        teams_after: result.units.iter().map(UnitRecord::from).collect(),
        iterations: result.iterations,
        migrations: result.improving_moves,
        accepted_worse: result.accepted_worse,
        improvement_pct: result.improvement_pct,
        gain: result.gain,
        computation_time: started.elapsed().as_secs_f64(),
        migration_log: Department::ALL
            .iter()
            .map(|&d| (d.name(), result.migrations.get(d)))
            .collect(),
        stop_reason: result.stop_reason,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
