//! `phadir` CLI - Command-line bulk importer for the PHA directory
//!
//! Provides commands for previewing delimited files, importing them into a
//! record store and listing the stored records.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use clap::Parser;
use cli::Cli;
use phadir_core::tracing::{TracingConfig, TracingLevel, TracingOutput, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    if !cli.quiet
        && let Err(e) = init_tracing(&tracing_config(&cli))
    {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = commands::dispatch(config_path, cli.quiet, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

/// Builds the logging setup from the global flags
fn tracing_config(cli: &Cli) -> TracingConfig {
    let mut config = TracingConfig::new().with_level(TracingLevel::from_verbosity(cli.verbose));
    if let Some(path) = &cli.log_file {
        config = config.with_output(TracingOutput::File { path: path.clone() });
    }
    if let Some(filter) = &cli.log_filter {
        config = config.with_filter(filter.clone());
    }
    config
}
