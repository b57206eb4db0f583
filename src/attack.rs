//! Drives a goose attack from the resolved [`Config`].
//!
//! Everything is handed to goose as defaults rather than parsed from the
//! command line, so the clap CLI stays the only argument parser. The
//! job-tracker host is the attack-wide default; a scenario with its own host
//! (app-tracking) keeps it.

use chrono::Utc;
use goose::config::GooseConfiguration;
use goose::prelude::*;
use tracing::info;

use crate::config::{Config, RunConfig};
use crate::error::LoadTestError;
use crate::report::RunSummary;

/// Seconds between goose running-metrics tables; `None` when disabled.
pub fn running_metrics_secs(run: &RunConfig) -> Option<usize> {
    run.stats_interval()
        .map(|interval| interval.as_secs() as usize)
}

/// Register `scenarios` and apply the run settings.
pub fn build(cfg: &Config, scenarios: Vec<Scenario>) -> Result<GooseAttack, LoadTestError> {
    if scenarios.is_empty() {
        return Err(LoadTestError::NoProfiles);
    }

    let mut attack = GooseAttack::initialize_with_config(GooseConfiguration::default())?
        .set_scheduler(GooseScheduler::Random);
    for scenario in scenarios {
        attack = attack.register_scenario(scenario);
    }

    let run = &cfg.run;
    let hatch_rate = run.spawn_rate.to_string();
    let timeout = run.request_timeout().as_secs().to_string();
    attack = *attack
        .set_default(GooseDefault::Host, cfg.web.host.trim())?
        .set_default(GooseDefault::Users, run.users)?
        .set_default(GooseDefault::HatchRate, hatch_rate.as_str())?
        .set_default(GooseDefault::Timeout, timeout.as_str())?
        .set_default(GooseDefault::NoResetMetrics, true)?
        .set_default(GooseDefault::NoTelnet, true)?
        .set_default(GooseDefault::NoWebSocket, true)?;

    if let Some(time) = run.time {
        attack = *attack.set_default(GooseDefault::RunTime, time.as_secs() as usize)?;
    }
    if let Some(iterations) = run.iterations {
        attack = *attack.set_default(GooseDefault::Iterations, iterations)?;
    }
    if let Some(secs) = running_metrics_secs(run) {
        attack = *attack.set_default(GooseDefault::RunningMetrics, secs)?;
    }
    if let Some(path) = &cfg.report.html_path {
        let report_file = path.to_string_lossy().into_owned();
        attack = *attack.set_default(GooseDefault::ReportFile, report_file.as_str())?;
    }
    Ok(attack)
}

/// Run the attack to completion (run time, iterations or Ctrl+C).
pub async fn run(cfg: &Config, scenarios: Vec<Scenario>) -> Result<RunSummary, LoadTestError> {
    let attack = build(cfg, scenarios)?;

    info!(
        users = cfg.run.users,
        spawn_rate = cfg.run.spawn_rate,
        run_time = ?cfg.run.time,
        iterations = ?cfg.run.iterations,
        host = %cfg.web.host,
        "starting load test"
    );
    let started_at = Utc::now();
    let metrics = attack.execute().await?;
    let summary = RunSummary::from_metrics(&metrics, started_at, Utc::now());

    info!(
        requests = summary.total_requests,
        failures = summary.total_failures,
        duration_secs = summary.duration_secs,
        "load test finished"
    );
    Ok(summary)
}
