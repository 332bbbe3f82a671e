use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kyc-progress",
    version,
    about = "Receipt-based KYC verification progress and investment eligibility"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding kyc.toml and .kyc/local.toml
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank every catalog goal by progress toward eligibility
    Goals(SnapshotCommand),
    /// Check eligibility for a single goal
    Eligible(EligibleCommand),
    /// Show the verification checklist
    Checklist(SnapshotCommand),
    /// Status, checklist and ranked goals in one report
    Report(SnapshotCommand),
    /// Show the active goal catalog
    Catalog(CatalogCommand),
    /// Manage the saved login session
    Session(SessionCommand),
}

#[derive(Args)]
pub struct SnapshotCommand {
    /// Metric snapshot JSON file
    pub snapshot: PathBuf,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct EligibleCommand {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub goal: String,
}

#[derive(Args)]
pub struct CatalogCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct SessionCommand {
    /// Directory the session file lives under (defaults to $HOME)
    #[arg(long)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub action: SessionAction,
}

#[derive(Subcommand)]
pub enum SessionAction {
    Show,
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        email: Option<String>,
    },
    Logout,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
