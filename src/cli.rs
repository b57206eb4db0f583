use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use goose::goose::Scenario;

use crate::config::Config;
use crate::profiles::ProfileKind;

/// Load generator for the job tracker web app and its Supabase backend.
///
/// Flags override `config/default.toml` and `LOCUST_*` environment variables.
#[derive(Debug, Parser)]
#[command(name = "jobtracker-loadtest", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to config/default.toml when present).
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// User profile to run; repeat to mix profiles.
    #[arg(short = 'p', long = "profile", value_enum)]
    pub profiles: Vec<ProfileKind>,

    /// Base URL for the job-tracker profile.
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Number of concurrent simulated users.
    #[arg(short = 'u', long)]
    pub users: Option<usize>,

    /// Users started per second.
    #[arg(short = 'r', long)]
    pub spawn_rate: Option<f64>,

    /// Stop after this long, e.g. 300s, 20m, 1h30m.
    #[arg(short = 't', long, value_parser = humantime::parse_duration)]
    pub run_time: Option<Duration>,

    /// Stop each user after this many passes over its transactions.
    #[arg(short = 'i', long)]
    pub iterations: Option<usize>,

    /// Also write the run summary as JSON.
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Write the goose HTML report here.
    #[arg(long)]
    pub html_report: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub log_json: bool,

    /// Print the selected profiles and their tasks, then exit.
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    pub fn apply(&self, cfg: &mut Config) {
        if !self.profiles.is_empty() {
            cfg.run.profiles = self.profiles.clone();
        }
        if let Some(host) = &self.host {
            cfg.web.host = host.clone();
        }
        if let Some(users) = self.users {
            cfg.run.users = users;
        }
        if let Some(rate) = self.spawn_rate {
            cfg.run.spawn_rate = rate;
        }
        if let Some(run_time) = self.run_time {
            cfg.run.time = Some(run_time);
        }
        if let Some(iterations) = self.iterations {
            cfg.run.iterations = Some(iterations);
        }
        if let Some(path) = &self.json_report {
            cfg.report.json_path = Some(path.clone());
        }
        if let Some(path) = &self.html_report {
            cfg.report.html_path = Some(path.clone());
        }
    }
}

/// Output of `--list`. Scenarios without a host of their own run against
/// `default_host`.
pub fn render_profiles(scenarios: &[Scenario], default_host: &str) -> String {
    let mut out = String::new();
    for scenario in scenarios {
        let host = scenario.host.as_deref().unwrap_or(default_host);
        let wait = match scenario.transaction_wait {
            Some((min, max)) => format!(
                "{}-{}",
                humantime::format_duration(min),
                humantime::format_duration(max)
            ),
            None => "none".to_string(),
        };
        let _ = writeln!(
            out,
            "{} (host: {}, wait: {}, weight: {})",
            scenario.name, host, wait, scenario.weight
        );

        let total: usize = scenario.transactions.iter().map(|t| t.weight).sum();
        for transaction in &scenario.transactions {
            let share = if total == 0 {
                0.0
            } else {
                transaction.weight as f64 / total as f64
            };
            let _ = writeln!(out, "  {:>5.1}%  {}", share * 100.0, transaction.name);
        }
    }
    out
}
