//! Error types for the import pipeline.
//!
//! `ImportError` is the job-level taxonomy: anything that stops a job before
//! or during a run. Per-row problems are `RecordError`s and are accumulated
//! by the batch loop instead of being propagated.

use std::path::PathBuf;

use thiserror::Error;

use crate::import::JobStatus;
use crate::models::CanonicalField;

/// Reasons a file is rejected before any mapping step runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileValidationError {
    /// File exceeds the size limit
    #[error("file is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Neither the extension nor the declared type is accepted
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    /// More data rows than the configured ceiling
    #[error("too many records: {count} (limit {limit})")]
    TooManyRecords {
        /// Number of data rows found
        count: usize,
        /// Configured row ceiling
        limit: usize,
    },

    /// File contains no non-blank lines
    #[error("file is empty")]
    EmptyFile,

    /// Header line has no usable column names
    #[error("file has no header row")]
    MissingHeader,
}

/// Job-level import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File rejected by intake or parser
    #[error("file validation failed: {0}")]
    FileValidation(#[from] FileValidationError),

    /// Caller is not authenticated
    #[error("authentication required")]
    AuthenticationRequired,

    /// A required canonical field has no enabled mapping
    #[error("required fields not mapped: {}", format_fields(.missing))]
    MappingIncomplete {
        /// Required fields without a mapping
        missing: Vec<CanonicalField>,
    },

    /// No column is enabled for import
    #[error("no columns selected for import")]
    EmptyMapping,

    /// Two enabled columns target the same field (strict mapping only)
    #[error("field '{field}' is mapped from more than one column: {}", .columns.join(", "))]
    DuplicateTargetMapping {
        /// Field bound more than once
        field: CanonicalField,
        /// Source columns bound to it, in declared order
        columns: Vec<String>,
    },

    /// Accumulated record errors exceeded the threshold
    #[error("too many errors: {errors} failed records (limit {limit}), {processed} imported before abort")]
    TooManyErrors {
        /// Error threshold
        limit: usize,
        /// Records imported before the abort
        processed: usize,
        /// Records failed before the abort
        errors: usize,
    },

    /// Write failure reported by the record store
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Job was cancelled between batches
    #[error("import cancelled")]
    Cancelled,

    /// Another job already holds the import lock
    #[error("another import is already running")]
    JobInProgress,

    /// Job status would move backwards or skip a stage
    #[error("invalid job transition from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: JobStatus,
        /// Requested status
        to: JobStatus,
    },

    /// Failed to read the input file
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    /// Returns true if the error is reported before any row is processed.
    #[must_use]
    pub const fn is_fail_fast(&self) -> bool {
        matches!(
            self,
            Self::FileValidation(_)
                | Self::AuthenticationRequired
                | Self::MappingIncomplete { .. }
                | Self::EmptyMapping
                | Self::DuplicateTargetMapping { .. }
        )
    }
}

fn format_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write for lack of authorization
    #[error("not authorized to write records")]
    Unauthorized,

    /// The write itself failed
    #[error("write failed: {0}")]
    Write(String),

    /// Backing file could not be read or written
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not valid JSON
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized => Self::AuthenticationRequired,
            other => Self::Persistence(other.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration directory could be determined
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// Settings file could not be read or written
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be encoded
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
