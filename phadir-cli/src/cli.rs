//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::util::parse_key_val;

/// Environment variable holding the session token for imports
pub const AUTH_TOKEN_ENV: &str = "PHADIR_AUTH_TOKEN";

/// `phadir` command-line interface for bulk-importing PHA contact records
#[derive(Parser)]
#[command(name = "phadir")]
#[command(author, version, about = "PHA directory bulk import tool")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write log output to a file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter directive, e.g. `phadir_core=debug` (overrides -v)
    #[arg(long, global = true, env = "PHADIR_LOG", value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List the canonical record fields
    #[command(about = "List the fields an import can populate")]
    Fields {
        /// Output format for the field list
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Validate and parse a file without importing it
    #[command(about = "Show the delimiter, headers and suggested mapping of a file")]
    Preview {
        /// Path to a .csv or .txt file
        file: PathBuf,

        /// Read only the header row and show the suggested mapping
        #[arg(long)]
        headers_only: bool,
    },

    /// Import a delimited file into the record store
    #[command(about = "Import PHA records from a CSV or TXT file")]
    Import {
        /// Path to a .csv or .txt file
        file: PathBuf,

        /// Map a column to a field (HEADER=field), overriding the suggestion
        #[arg(short, long = "map", value_parser = parse_key_val)]
        mappings: Vec<(String, String)>,

        /// Disable the mapping for a column
        #[arg(short, long = "skip")]
        skip: Vec<String>,

        /// Record store file (defaults to records.json in the config directory)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Session token; an import is refused without one
        #[arg(long, env = AUTH_TOKEN_ENV, hide_env_values = true)]
        token: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Reject mappings that bind one field to several columns
        #[arg(long)]
        strict_mapping: bool,
    },

    /// List stored records
    #[command(about = "List records in the record store")]
    List {
        /// Record store file (defaults to records.json in the config directory)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output format for the record list
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for scripting
    Json,
    /// CSV format for spreadsheet import
    Csv,
}
