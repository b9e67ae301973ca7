//! Import outcome types.
//!
//! `ImportResult` is the compact wire shape reported to callers.
//! `ImportReport` carries everything the batch loop collected, including
//! per-record messages.

use serde::Serialize;
use thiserror::Error;

use crate::error::ImportError;
use crate::models::CanonicalField;

/// Why a single row was not imported. Recoverable: the batch loop records it
/// and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is blank or unmapped for this row
    #[error("missing required field '{0}'")]
    MissingRequiredField(CanonicalField),

    /// The store rejected the write
    #[error("failed to save: {0}")]
    Persistence(String),

    /// The store refused the write for lack of authorization
    #[error("not authorized to save")]
    Unauthorized,
}

/// A non-fatal problem with a row that was still imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordWarning {
    /// Field whose value looks wrong
    pub field: CanonicalField,
    /// Description of the problem
    pub message: String,
}

impl RecordWarning {
    /// Creates a warning for a field
    #[must_use]
    pub fn new(field: CanonicalField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} in {}", self.message, self.field)
    }
}

/// Formats a per-record message as `Record <n>: <reason>`
#[must_use]
pub fn record_message(number: usize, reason: impl std::fmt::Display) -> String {
    format!("Record {number}: {reason}")
}

/// Terminal result of an import job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// True if the job completed
    pub success: bool,
    /// Records written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_count: Option<usize>,
    /// Records that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_count: Option<usize>,
    /// Summary for a completed job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Reason a job failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResult {
    /// Result of a completed job
    #[must_use]
    pub fn completed(processed: usize, errors: usize) -> Self {
        let message = if errors == 0 {
            format!("Successfully imported {processed} records")
        } else {
            format!("Imported {processed} records with {errors} errors")
        };
        Self {
            success: true,
            processed_count: Some(processed),
            error_count: Some(errors),
            message: Some(message),
            error: None,
        }
    }

    /// Result of a job that failed before any row was touched
    #[must_use]
    pub fn failed(error: &ImportError) -> Self {
        Self {
            success: false,
            processed_count: None,
            error_count: None,
            message: None,
            error: Some(error.to_string()),
        }
    }

    /// Result of a job that failed mid-run; partial counts are kept
    #[must_use]
    pub fn aborted(error: &ImportError, processed: usize, errors: usize) -> Self {
        Self {
            success: false,
            processed_count: Some(processed),
            error_count: Some(errors),
            message: None,
            error: Some(error.to_string()),
        }
    }
}

/// Everything a run collected, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Records written
    pub processed_count: usize,
    /// Records that failed
    pub error_count: usize,
    /// Records inserted as new
    pub inserted: usize,
    /// Records updated in place by natural key
    pub updated: usize,
    /// Batches fully processed
    pub batches_processed: usize,
    /// `Record <n>: <reason>` for every failed record
    pub errors: Vec<String>,
    /// `Record <n>: <warning>` for imported records with suspicious values
    pub warnings: Vec<String>,
    /// True if the run stopped on a cancellation request
    pub cancelled: bool,
}

impl ImportReport {
    /// Creates an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful write
    pub fn record_success(&mut self, updated: bool) {
        self.processed_count += 1;
        if updated {
            self.updated += 1;
        } else {
            self.inserted += 1;
        }
    }

    /// Records a failed row
    pub fn record_failure(&mut self, number: usize, error: &RecordError) {
        self.error_count += 1;
        self.errors.push(record_message(number, error));
    }

    /// Records a warning for an imported row
    pub fn record_warning(&mut self, number: usize, warning: &RecordWarning) {
        self.warnings.push(record_message(number, warning));
    }

    /// Returns a one-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Imported: {} (new: {}, updated: {}), Errors: {}, Warnings: {}",
            self.processed_count,
            self.inserted,
            self.updated,
            self.error_count,
            self.warnings.len()
        )
    }
}
