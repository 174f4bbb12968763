use clap::{Args, Parser, Subcommand};
use solvbatch::engine::config::MissingResultPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "solvbatch - Batch Abraham solvation estimates for many solvent/solute pairs through an external estimator.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the estimator once per solvent and write the solvation report.
    Run(RunArgs),
    /// Check the input files and show how requests would be batched, without running anything.
    Plan(PlanArgs),
}

/// Input files and configuration shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the platform configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Adjacency list file with one record per solute.
    #[arg(short = 'a', long, value_name = "PATH")]
    pub adjacency: Option<PathBuf>,

    /// Solvent parameter table (CSV with the six Abraham coefficients).
    #[arg(short = 's', long, value_name = "PATH")]
    pub solvents: Option<PathBuf>,

    /// Solvent/solute pair list (CSV with `Solvent` and `Solute` columns).
    #[arg(short = 'p', long, value_name = "PATH")]
    pub pairs: Option<PathBuf>,

    /// Prefix that marks identifier lines in the adjacency file and in estimator output.
    #[arg(long, value_name = "PREFIX")]
    pub identifier_prefix: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S estimator.timeout-secs=600
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Path for the solvation report CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    // --- Estimator Overrides ---
    /// Program used to launch the estimator.
    #[arg(long, value_name = "PROGRAM")]
    pub program: Option<String>,

    /// Classpath passed to the estimator. Defaults to `$RMG/classes`.
    #[arg(long, value_name = "PATHS")]
    pub classpath: Option<String>,

    /// Entry point of the estimator.
    #[arg(long, value_name = "CLASS")]
    pub main_class: Option<String>,

    /// Kill an estimator run that takes longer than this many seconds.
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    // --- Staging Overrides ---
    /// Directory under which per-run staging directories are created.
    #[arg(long, value_name = "PATH")]
    pub staging_dir: Option<PathBuf>,

    /// Keep the staging directory after the run for inspection.
    #[arg(long)]
    pub keep_staging: bool,

    /// What to do when a successful batch did not produce a requested value.
    #[arg(long, value_name = "POLICY")]
    pub on_missing_result: Option<MissingResultPolicy>,
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}
