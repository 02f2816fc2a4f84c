//! PuffLog — consumption log analysis and taper plan evaluation.
//!
//! Thin collaborator around the pure engine crates: reads a JSON event
//! log and an optional plan snapshot from disk, runs one evaluation pass,
//! and prints the derived report. All I/O lives here; the engine itself
//! never touches the filesystem or the clock.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use pufflog_core::config::AppConfig;
use pufflog_core::types::{
    BaselineResult, DerivedTaperState, Plan, PlanStatus, Suggestion, UsageEvent,
};
use pufflog_core::{TaperError, TaperResult};
use pufflog_stats::{
    aggregate_daily_totals, compute_baseline, ema, rolling_mean, summarize_usage, trend_flags,
    TrendSignal, TrendThresholds, UsageSummary,
};
use pufflog_taper::TaperController;

#[derive(Parser, Debug)]
#[command(name = "pufflog")]
#[command(about = "Consumption log analysis and taper plan evaluation")]
#[command(version)]
struct Cli {
    /// Path to the JSON event log (array of usage events)
    #[arg(long, env = "PUFFLOG__LOG_FILE")]
    log_file: PathBuf,

    /// Path to a JSON plan snapshot to evaluate against
    #[arg(long, env = "PUFFLOG__PLAN_FILE")]
    plan_file: Option<PathBuf>,

    /// Aggregation window in days (overrides config)
    #[arg(long, env = "PUFFLOG__WINDOW_DAYS")]
    window_days: Option<u32>,

    /// Evaluation date, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

/// Everything one evaluation pass derives from the log and the plan.
#[derive(Debug, Serialize)]
struct Report {
    baseline: BaselineResult,
    summary: UsageSummary,
    trend: TrendSignal,
    /// Smoothed daily series for charting: 7-day rolling mean and EMA.
    rolling_mean_g: Vec<f64>,
    ema_g: Vec<f64>,
    derived: DerivedTaperState,
    plan_status: Option<PlanStatus>,
    suggestions: Vec<Suggestion>,
}

fn load_events(path: &Path) -> TaperResult<Vec<UsageEvent>> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| TaperError::EventLog(format!("{}: {e}", path.display())))
}

fn load_plan(path: &Path) -> TaperResult<Plan> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| TaperError::Snapshot(format!("{}: {e}", path.display())))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pufflog=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(days) = cli.window_days {
        config.window_days = days;
    }

    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());

    let events = load_events(&cli.log_file)?;
    info!(events = events.len(), window_days = config.window_days, %today, "Log loaded");

    let plan = match &cli.plan_file {
        Some(path) => {
            let plan = load_plan(path)?;
            info!(strategy = ?plan.strategy, status = ?plan.status, "Plan snapshot loaded");
            Some(plan)
        }
        None => None,
    };

    let totals = aggregate_daily_totals(&events, config.window_days, today);
    let baseline = compute_baseline(&totals);
    let summary = summarize_usage(&events, config.window_days, today);

    let values: Vec<f64> = totals.iter().map(|t| t.grams).collect();
    let trend = trend_flags(
        &values,
        baseline.baseline_g,
        TrendThresholds {
            rising: config.taper.rising_slope_frac,
            strong_rising: config.taper.strong_rising_slope_frac,
        },
    );

    let mut controller = TaperController::hydrate(config.taper.clone(), plan);
    let derived = controller.evaluate(&totals, &baseline, today);

    let report = Report {
        baseline,
        summary,
        trend,
        rolling_mean_g: rolling_mean(&values, 7),
        ema_g: ema(&values, 0.2),
        derived,
        plan_status: controller.plan().map(|p| p.status),
        suggestions: controller.suggestions().to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
