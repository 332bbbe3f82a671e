mod cli;
mod config;
mod error;
mod projector;
mod report;
mod session;
mod types;

use crate::error::{KycError, Result};
use crate::types::config::KycConfig;
use crate::types::metrics::MetricSnapshot;
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const NOT_ELIGIBLE: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn load_config_or_default(dir: &Path) -> Result<KycConfig> {
    match config::load_config(dir)? {
        Some(cfg) => Ok(cfg),
        None => {
            tracing::warn!(
                "no {} found in {}; using built-in catalog",
                config::DEFAULT_CONFIG_FILE,
                dir.display()
            );
            Ok(KycConfig::default())
        }
    }
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn load_snapshot(path: &Path) -> Result<MetricSnapshot> {
    let snapshot = MetricSnapshot::load(path)?;
    tracing::debug!(
        score = snapshot.score,
        total_spending = snapshot.total_spending,
        receipts_processed = snapshot.receipts_processed,
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn state_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn run() -> Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Goals(cmd) => {
            let cfg = load_config_or_default(&cli.config_dir)?;
            let metrics = load_snapshot(&cmd.snapshot)?;
            let ranking = projector::rank(&metrics, &cfg.catalog);
            tracing::info!(
                eligible = ranking.eligible_count(),
                goals = ranking.goals.len(),
                "ranked goals"
            );
            println!("{}", report::render(&ranking, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Eligible(cmd) => {
            let cfg = load_config_or_default(&cli.config_dir)?;
            let metrics = load_snapshot(&cmd.snapshot)?;
            let goal = cfg
                .catalog
                .goal(&cmd.goal)
                .ok_or_else(|| KycError::UnknownGoal(cmd.goal.clone()))?;
            let evaluated = projector::evaluate_goal(&metrics, goal, &cfg.catalog);

            if evaluated.progress.eligible {
                println!("eligible: {} ({})", goal.name, goal.id);
                return Ok(exit_code::SUCCESS);
            }

            println!(
                "not eligible: {} ({}) at {}",
                goal.name,
                goal.id,
                report::md::fmt_percent(evaluated.progress.overall)
            );
            let shortfall = evaluated.shortfall;
            if shortfall.score_points > 0.0 {
                println!(
                    "- score: {} needed",
                    report::md::points_label(shortfall.score_points)
                );
            }
            if shortfall.amount > 0.0 {
                println!("- spending: KES {:.0} needed", shortfall.amount.ceil());
            }
            if shortfall.receipts > 0 {
                println!("- receipts: {} more processed", shortfall.receipts);
            }
            Ok(exit_code::NOT_ELIGIBLE)
        }
        cli::Commands::Checklist(cmd) => {
            let cfg = load_config_or_default(&cli.config_dir)?;
            let metrics = load_snapshot(&cmd.snapshot)?;
            let checklist = projector::build_verification_checklist(
                &metrics,
                &cfg.checklist,
                &cfg.verification,
            );
            println!("{}", report::render(&checklist, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Report(cmd) => {
            let cfg = load_config_or_default(&cli.config_dir)?;
            let metrics = load_snapshot(&cmd.snapshot)?;
            let projection = projector::project(&metrics, &cfg)?;
            tracing::info!(status = projection.status.as_str(), "projected snapshot");
            println!("{}", report::render(&projection, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Catalog(cmd) => {
            let cfg = load_config_or_default(&cli.config_dir)?;
            let summary = projector::summarize_catalog(&cfg.catalog)?;
            println!("{}", report::render(&summary, output_format(cmd.format))?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Session(cmd) => {
            let dir = state_dir(cmd.state_dir);
            let state = match cmd.action {
                cli::SessionAction::Show => session::SessionState::load(&dir)?,
                cli::SessionAction::Login { token, email } => {
                    session::SessionState::login(&dir, &token, email.as_deref())?
                }
                cli::SessionAction::Logout => session::SessionState::logout(&dir)?,
            };
            let view = match state.view() {
                session::View::Login => "login",
                session::View::Dashboard => "dashboard",
            };
            println!("view: {view}");
            if let Some(email) = &state.email {
                println!("user: {email}");
            }
            Ok(exit_code::SUCCESS)
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
