//! Import command: run one file through the pipeline into the record store.

use std::fmt::Write as _;
use std::path::Path;

use phadir_core::import::{ImportJob, JobOutcome};
use phadir_core::progress::{CallbackProgressReporter, ImportProgress, ProgressReporter};
use phadir_core::{CanonicalField, ImportController, JsonFileStore};

use crate::error::CliError;
use crate::util::{create_config_manager, resolve_store_path, runtime};

/// Messages shown per category before the rest is summarized
const MAX_LISTED_MESSAGES: usize = 10;

/// Parameters for the import command
#[allow(clippy::struct_excessive_bools)]
pub struct ImportParams<'a> {
    pub file: &'a Path,
    pub mappings: &'a [(String, String)],
    pub skip: &'a [String],
    pub store: Option<&'a Path>,
    pub token: Option<&'a str>,
    pub json: bool,
    pub strict_mapping: bool,
    pub quiet: bool,
}

/// Import command handler
pub fn cmd_import(config_path: Option<&Path>, params: ImportParams<'_>) -> Result<(), CliError> {
    let config_manager = create_config_manager(config_path)?;
    let mut settings = config_manager.load_settings()?;
    if params.strict_mapping {
        settings = settings.with_reject_duplicate_targets(true);
    }
    let store_path = resolve_store_path(&config_manager, params.store);
    let authenticated = params.token.is_some_and(|t| !t.trim().is_empty());
    let controller = ImportController::new(settings);

    let outcome = runtime()?.block_on(async {
        let mut job = controller.prepare_path(params.file).await?;
        apply_overrides(&mut job, params.mappings, params.skip)?;

        let store = JsonFileStore::open(&store_path).await?;
        let reporter = CallbackProgressReporter::new(print_progress);
        let progress: Option<&dyn ProgressReporter> =
            if params.quiet { None } else { Some(&reporter) };

        let outcome = controller
            .run(&mut job, &store, authenticated, progress)
            .await?;
        if progress.is_some() && outcome.report.processed_count + outcome.report.error_count > 0 {
            eprintln!();
        }

        if outcome.report.inserted + outcome.report.updated > 0 {
            store.save().await?;
            tracing::info!(path = %store.path().display(), "Record store saved");
        }
        Ok::<JobOutcome, CliError>(outcome)
    })?;

    if params.json {
        let json = serde_json::to_string_pretty(&outcome.result)
            .map_err(|e| CliError::Config(format!("Failed to serialize to JSON: {e}")))?;
        println!("{json}");
    } else if !params.quiet {
        println!("{}", format_outcome(&outcome));
    }

    match outcome.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Applies `--map` and `--skip` edits to the job's mapping session
fn apply_overrides(
    job: &mut ImportJob,
    mappings: &[(String, String)],
    skip: &[String],
) -> Result<(), CliError> {
    let Some(session) = job.mapping_session_mut() else {
        return Err(CliError::Validation("file has no editable mapping".to_string()));
    };

    for (header, field) in mappings {
        let target = match field.trim() {
            "" | "-" | "none" => None,
            name => Some(
                name.parse::<CanonicalField>()
                    .map_err(|e| CliError::Validation(e.to_string()))?,
            ),
        };
        if !session.set_target(header, target) {
            return Err(CliError::Validation(format!("Unknown column: {header}")));
        }
    }

    for header in skip {
        if !session.toggle(header, false) {
            return Err(CliError::Validation(format!("Unknown column: {header}")));
        }
    }
    Ok(())
}

fn print_progress(progress: &ImportProgress) {
    let label = progress.current_record_label.as_deref().unwrap_or_default();
    eprint!(
        "\rImporting {}/{} {:<40}",
        progress.current,
        progress.total,
        crate::format::truncate_display(label, 40)
    );
}

/// Format the outcome of a run for the terminal
#[must_use]
pub fn format_outcome(outcome: &JobOutcome) -> String {
    let mut output = String::new();
    if let Some(message) = &outcome.result.message {
        let _ = writeln!(output, "{message}");
    }
    if let Some(error) = &outcome.result.error {
        let _ = writeln!(output, "Import failed: {error}");
    }
    let _ = writeln!(output, "{}", outcome.report.summary());

    append_messages(&mut output, "Errors", &outcome.report.errors);
    append_messages(&mut output, "Warnings", &outcome.report.warnings);
    output.trim_end().to_string()
}

fn append_messages(output: &mut String, title: &str, messages: &[String]) {
    if messages.is_empty() {
        return;
    }
    let _ = writeln!(output, "\n{title}:");
    for message in messages.iter().take(MAX_LISTED_MESSAGES) {
        let _ = writeln!(output, "  {message}");
    }
    if messages.len() > MAX_LISTED_MESSAGES {
        let _ = writeln!(
            output,
            "  ... and {} more",
            messages.len() - MAX_LISTED_MESSAGES
        );
    }
}
