//! Bulk import of PHA contact records from delimited text files.
//!
//! The pipeline, in order:
//!
//! 1. [`FileIntake`] checks size and type before anything is read.
//! 2. [`DelimitedParser`] detects the separator, tokenizes quote-aware and
//!    aligns rows to the header.
//! 3. [`FieldMapCatalog`] suggests a column mapping from known header names.
//! 4. [`MappingSession`] lets the caller adjust it; confirmation requires
//!    every required field to be mapped.
//! 5. [`RecordTransformer`] sanitizes each row into a `CanonicalRecord`.
//! 6. [`BatchImporter`] writes records in sequential batches, collecting
//!    per-row errors and aborting once they exceed the threshold.
//!
//! [`ImportController`] ties the steps together for one [`ImportJob`] at a
//! time:
//!
//! ```ignore
//! let controller = ImportController::new(settings);
//! let mut job = controller.prepare_path(&path).await?;
//! job.mapping_session_mut().unwrap().toggle("NOTES", false);
//! let outcome = controller.run(&mut job, &store, authenticated, None).await?;
//! println!("{}", outcome.report.summary());
//! ```

pub mod batch;
pub mod catalog;
pub mod intake;
pub mod job;
pub mod parser;
pub mod result;
pub mod session;
pub mod transform;

pub use batch::{BatchImportResult, BatchImporter};
pub use catalog::{FieldMapCatalog, normalize_header};
pub use intake::{ACCEPTED_CONTENT_TYPES, ACCEPTED_EXTENSIONS, FileIntake, FileMeta};
pub use job::{ImportController, ImportJob, JobOutcome, JobState, JobStatus};
pub use parser::{
    DelimitedParser, Delimiter, ParsedFile, RawRow, detect_delimiter, extract_headers,
    normalize_cell, tokenize_line,
};
pub use result::{ImportReport, ImportResult, RecordError, RecordWarning};
pub use session::{ConfirmedMapping, MappingSession, RequiredFieldStatus};
pub use transform::{RecordTransformer, TransformedRecord, is_plausible_email, sanitize};
