//! Command handler modules for the CLI.

mod completions;
mod fields;
mod import;
mod list;
mod preview;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, quiet: bool, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Fields { format } => fields::cmd_fields(format),
        Commands::Preview { file, headers_only } => {
            preview::cmd_preview(config_path, &file, headers_only)
        }
        Commands::Import {
            file,
            mappings,
            skip,
            store,
            token,
            json,
            strict_mapping,
        } => import::cmd_import(
            config_path,
            import::ImportParams {
                file: &file,
                mappings: &mappings,
                skip: &skip,
                store: store.as_deref(),
                token: token.as_deref(),
                json,
                strict_mapping,
                quiet,
            },
        ),
        Commands::List { store, format } => list::cmd_list(config_path, store.as_deref(), format),
        Commands::Completions { shell } => completions::cmd_completions(shell),
    }
}
