use anyhow::Result;
use clap::Parser;
use jobtracker_loadtest::{attack, cli, config, profiles, telemetry};
use cli::Cli;
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env file: {e}");
        }
    }

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut cfg = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut cfg);
    cfg.validate()?;

    let scenarios = profiles::build_selected(&cfg)?;
    if cli.list {
        print!("{}", cli::render_profiles(&scenarios, &cfg.web.host));
        return Ok(());
    }

    let job_tracker = cfg.run.profiles.contains(&profiles::ProfileKind::JobTracker);
    if job_tracker && (cfg.supabase.url().is_none() || cfg.supabase.anon_key().is_none()) {
        info!("Supabase URL or anon key not set, the supabase jobs list task will be skipped");
    }

    let summary = attack::run(&cfg, scenarios).await?;
    if let Some(path) = &cfg.report.json_path {
        summary.write_json(path)?;
        info!(path = %path.display(), "JSON summary written");
    }

    let exit_code = summary.exit_code(cfg.report.fail_exit_code);
    if exit_code != 0 {
        warn!(failures = summary.total_failures, exit_code, "requests failed");
        std::process::exit(exit_code);
    }
    Ok(())
}
