//! `phadir` Core Library
//!
//! Bulk import of housing-authority contact records from delimited text
//! files into a record store.
//!
//! # Crate Structure
//!
//! - [`import`] - The import pipeline: intake, parsing, mapping, transformation,
//!   batch execution and the job controller
//! - [`models`] - Canonical fields, column mappings and records
//! - [`store`] - The `RecordStore` contract with in-memory and JSON-file stores
//! - [`config`] - Import settings and their TOML persistence
//! - [`progress`] - Progress reporting and cancellation
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod progress;
pub mod store;
pub mod tracing;

pub use config::{ConfigManager, ImportSettings};
pub use error::{
    ConfigError, ConfigResult, FileValidationError, ImportError, StoreError, StoreResult,
};
pub use import::{
    BatchImporter, ConfirmedMapping, DelimitedParser, Delimiter, FieldMapCatalog, FileIntake,
    FileMeta, ImportController, ImportJob, ImportReport, ImportResult, JobOutcome, JobState,
    JobStatus, MappingSession, ParsedFile, RawRow, RecordError, RecordTransformer,
    RequiredFieldStatus,
};
pub use models::{CanonicalField, CanonicalRecord, FieldMapping};
pub use progress::{
    CallbackProgressReporter, CancellationToken, ImportProgress, NoOpProgressReporter,
    ProgressReporter,
};
pub use store::{JsonFileStore, MemoryStore, RecordStore, StoredRecord, UpsertOutcome};
pub use tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
    is_tracing_initialized,
};
