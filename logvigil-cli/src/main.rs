//! logvigil binary entry point
//!
//! Wires argument parsing, configuration loading, and logging setup, then
//! dispatches to the per-subcommand handlers. Errors map to process exit
//! codes via [`CliError::exit_code`].

use clap::Parser;

mod cli;
mod commands;
mod error;
mod export;
mod output;

use cli::{Cli, Commands};
use error::CliError;
use logvigil_core::config::VigilConfig;
use output::OutputWriter;

fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.output);

    if let Err(e) = run(cli, &writer) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    match cli.command {
        Commands::Analyze(args) => {
            // env override warnings fire while the config is loading, before
            // the real subscriber exists, so loading runs under a temporary one
            let config = tracing::subscriber::with_default(fallback_subscriber(), || {
                VigilConfig::load(&cli.config)
            })?;
            init_tracing(
                cli.log_level
                    .as_deref()
                    .unwrap_or(&config.general.log_level),
                &config.general.log_format,
            );
            tracing::info!(config = %cli.config.display(), "logvigil starting");
            commands::analyze::execute(args, &config, writer)
        }
        Commands::Config(args) => {
            // config subcommands must run even when the file is broken,
            // so logging cannot depend on the loaded config here
            init_tracing(cli.log_level.as_deref().unwrap_or("info"), "pretty");
            commands::config::execute(args, &cli.config, writer)
        }
    }
}

/// Stderr subscriber used while the configuration is still loading.
fn fallback_subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .with_writer(std::io::stderr)
        .finish()
}

/// Initialize the global tracing subscriber.
///
/// Falls back to `info` if the level string is not a valid filter directive.
fn init_tracing(level: &str, format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
