//! Preview command: validate and parse a file, then show the suggested mapping.

use std::fmt::Write as _;
use std::path::Path;

use phadir_core::import::{ImportJob, MappingSession};
use phadir_core::ImportController;

use crate::error::CliError;
use crate::format::truncate_display;
use crate::util::{create_config_manager, runtime};

/// Preview command handler
pub fn cmd_preview(
    config_path: Option<&Path>,
    file: &Path,
    headers_only: bool,
) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let settings = config_manager.load_settings()?;
    let controller = ImportController::new(settings);
    let runtime = runtime()?;

    if headers_only {
        let session = runtime.block_on(controller.suggest_path(file))?;
        println!("{}", format_mapping(&session).trim_end());
    } else {
        let job = runtime.block_on(controller.prepare_path(file))?;
        println!("{}", format_preview(&job));
    }
    Ok(())
}

/// Format a validated job as a preview report
#[must_use]
pub fn format_preview(job: &ImportJob) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "File:      {}", job.file_meta().name);

    let Some(parsed) = job.parsed() else {
        return output.trim_end().to_string();
    };
    let _ = writeln!(output, "Delimiter: {}", parsed.delimiter);
    let _ = writeln!(output, "Columns:   {}", parsed.headers.len());
    let _ = writeln!(output, "Rows:      {}", parsed.row_count());
    let _ = writeln!(output);

    if let Some(session) = job.mapping_session() {
        output.push_str(&format_mapping(session));
    }
    output.trim_end().to_string()
}

fn format_mapping(session: &MappingSession) -> String {
    let mut output = String::new();
    let column_width = session
        .mappings()
        .iter()
        .map(|m| m.source_column.chars().count().min(40))
        .max()
        .unwrap_or(6)
        .max(6);

    let _ = writeln!(output, "{:<column_width$}  {:<14}  ENABLED", "COLUMN", "FIELD");
    let _ = writeln!(output, "{:-<column_width$}  {:-<14}  {:-<7}", "", "", "");
    for mapping in session.mappings() {
        let target = mapping
            .target_field
            .map_or_else(|| "-".to_string(), |f| f.as_str().to_string());
        let _ = writeln!(
            output,
            "{:<column_width$}  {:<14}  {}",
            truncate_display(&mapping.source_column, 40),
            target,
            if mapping.enabled { "yes" } else { "no" }
        );
    }

    let status = MappingSession::required_field_status(&session.confirmed_mappings());
    if status.satisfied {
        let _ = writeln!(output, "\nAll required fields are mapped.");
    } else {
        let missing: Vec<&str> = status.missing_required.iter().map(|f| f.as_str()).collect();
        let _ = writeln!(
            output,
            "\nMissing required fields: {} (use --map HEADER=field)",
            missing.join(", ")
        );
    }
    for (field, columns) in session.duplicate_targets() {
        let _ = writeln!(
            output,
            "Note: '{field}' is mapped from {}; the last column wins",
            columns.join(", ")
        );
    }
    output
}
