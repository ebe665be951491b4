//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Logvigil -- offline log file analyzer for intrusion detection.
///
/// Use `logvigil <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logvigil", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logvigil.toml configuration file.
    #[arg(short, long, default_value = "logvigil.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze log files and report incidents.
    Analyze(AnalyzeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Run a one-shot analysis over collected log files.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Path to an Apache combined-format access log.
    #[arg(long)]
    pub http_log: Option<PathBuf>,

    /// Path to an SSH auth.log-style authentication log.
    #[arg(long)]
    pub ssh_log: Option<PathBuf>,

    /// Reference year for SSH timestamps (auth.log lacks a year).
    /// Defaults to the current year.
    #[arg(long)]
    pub year: Option<i32>,

    /// Override the report output directory from the config file.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Skip writing report files, print to stdout only.
    #[arg(long)]
    pub no_export: bool,
}

// ---- config ----

/// Inspect or validate the configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, http, ssh, scan, blacklist, report).
        #[arg(long)]
        section: Option<String>,
    },
}
