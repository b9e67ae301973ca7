//! List stored records command.

use std::fmt::Write as _;
use std::path::Path;

use phadir_core::{JsonFileStore, RecordStore, StoredRecord};

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{escape_csv_field, truncate_display};
use crate::util::{create_config_manager, resolve_store_path, runtime};

/// List command handler
pub fn cmd_list(
    config_path: Option<&Path>,
    store: Option<&Path>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let store_path = resolve_store_path(&config_manager, store);

    let records = runtime()?.block_on(async {
        let store = JsonFileStore::open(&store_path).await?;
        store.list().await
    })?;

    match format {
        OutputFormat::Table => println!("{}", format_table(&records)),
        OutputFormat::Json => println!("{}", format_json(&records)?),
        OutputFormat::Csv => println!("{}", format_csv(&records)),
    }
    Ok(())
}

/// Format records as a table string
#[must_use]
pub fn format_table(records: &[StoredRecord]) -> String {
    if records.is_empty() {
        return "No records found.".to_string();
    }

    let mut output = String::new();
    let code_width = records
        .iter()
        .map(|r| r.record.code.as_deref().map_or(1, str::len))
        .max()
        .unwrap_or(4)
        .max(4);
    let name_width = records
        .iter()
        .map(|r| r.record.name().chars().count().min(40))
        .max()
        .unwrap_or(4)
        .max(4);
    let email_width = 30;

    let _ = writeln!(
        output,
        "{:<code_width$}  {:<name_width$}  {:<email_width$}  PROGRAM",
        "CODE", "NAME", "EMAIL"
    );
    let _ = writeln!(
        output,
        "{:-<code_width$}  {:-<name_width$}  {:-<email_width$}  {:-<7}",
        "", "", "", ""
    );
    for stored in records {
        let record = &stored.record;
        let _ = writeln!(
            output,
            "{:<code_width$}  {:<name_width$}  {:<email_width$}  {}",
            record.code.as_deref().unwrap_or("-"),
            truncate_display(record.name(), 40),
            truncate_display(record.email.as_deref().unwrap_or("-"), email_width),
            record.program_type.as_deref().unwrap_or("-")
        );
    }

    output.trim_end().to_string()
}

/// Format records as JSON string
///
/// # Errors
///
/// Returns `CliError::Config` if JSON serialization fails.
pub fn format_json(records: &[StoredRecord]) -> Result<String, CliError> {
    serde_json::to_string_pretty(records)
        .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))
}

/// Format records as CSV string
#[must_use]
pub fn format_csv(records: &[StoredRecord]) -> String {
    let mut output = String::new();
    output.push_str("id,code,name,address,phone,email,exec_dir_email,program_type\n");

    for stored in records {
        let record = &stored.record;
        let cell = |value: Option<&str>| escape_csv_field(value.unwrap_or_default());
        let _ = writeln!(
            output,
            "{},{},{},{},{},{},{},{}",
            stored.id,
            cell(record.code.as_deref()),
            escape_csv_field(record.name()),
            cell(record.address.as_deref()),
            cell(record.phone.as_deref()),
            cell(record.email.as_deref()),
            cell(record.exec_dir_email.as_deref()),
            cell(record.program_type.as_deref())
        );
    }

    output.trim_end().to_string()
}
