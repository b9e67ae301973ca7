//! List canonical fields command.

use std::fmt::Write as _;

use phadir_core::CanonicalField;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Fields command handler
pub fn cmd_fields(format: OutputFormat) -> Result<(), CliError> {
    let fields = CanonicalField::all();
    let output = match format {
        OutputFormat::Table => format_table(fields),
        OutputFormat::Json => format_json(fields)?,
        OutputFormat::Csv => format_csv(fields),
    };
    println!("{output}");
    Ok(())
}

/// Format fields as a table string
#[must_use]
pub fn format_table(fields: &[CanonicalField]) -> String {
    let mut output = String::new();
    let name_width = fields
        .iter()
        .map(|f| f.as_str().len())
        .max()
        .unwrap_or(5)
        .max(5);
    let label_width = fields
        .iter()
        .map(|f| f.display_name().len())
        .max()
        .unwrap_or(5)
        .max(5);

    let _ = writeln!(
        output,
        "{:<name_width$}  {:<label_width$}  {:<7}  REQUIRED",
        "FIELD", "LABEL", "MAX LEN"
    );
    let _ = writeln!(
        output,
        "{:-<name_width$}  {:-<label_width$}  {:-<7}  {:-<8}",
        "", "", "", ""
    );
    for field in fields {
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<label_width$}  {:<7}  {}",
            field.as_str(),
            field.display_name(),
            field.max_len(),
            if field.is_required() { "yes" } else { "no" }
        );
    }

    output.trim_end().to_string()
}

/// Format fields as JSON string
///
/// # Errors
///
/// Returns `CliError::Config` if JSON serialization fails.
pub fn format_json(fields: &[CanonicalField]) -> Result<String, CliError> {
    let output: Vec<serde_json::Value> = fields
        .iter()
        .map(|f| {
            serde_json::json!({
                "field": f.as_str(),
                "label": f.display_name(),
                "maxLength": f.max_len(),
                "required": f.is_required(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))
}

/// Format fields as CSV string
#[must_use]
pub fn format_csv(fields: &[CanonicalField]) -> String {
    let mut output = String::from("field,label,max_length,required\n");
    for field in fields {
        let _ = writeln!(
            output,
            "{},{},{},{}",
            field.as_str(),
            field.display_name(),
            field.max_len(),
            field.is_required()
        );
    }
    output.trim_end().to_string()
}
