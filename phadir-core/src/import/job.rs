//! Import jobs and the controller that runs them.
//!
//! An [`ImportJob`] carries one file from selection to a terminal result. Its
//! status only moves forward:
//!
//! ```text
//! Created -> Validated -> Mapped -> Importing -> Completed
//!    \           \           \          \
//!     `-----------`-----------`----------`-> Failed
//! ```
//!
//! [`ImportController`] runs at most one job at a time and publishes job
//! state on a watch channel for observers.

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ImportSettings;
use crate::error::{FileValidationError, ImportError};
use crate::progress::{CancellationToken, ImportProgress, ProgressReporter};
use crate::store::RecordStore;
use crate::tracing::span_names;

use super::batch::BatchImporter;
use super::catalog::FieldMapCatalog;
use super::intake::{FileIntake, FileMeta};
use super::parser::{DelimitedParser, ParsedFile, extract_headers};
use super::result::{ImportReport, ImportResult};
use super::session::{ConfirmedMapping, MappingSession};
use super::transform::RecordTransformer;

/// Lifecycle stage of an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// File selected, nothing checked yet
    Created,
    /// File accepted and parsed; mapping can be edited
    Validated,
    /// Mapping confirmed
    Mapped,
    /// Rows are being written
    Importing,
    /// All rows handled
    Completed,
    /// Stopped with an error
    Failed,
}

impl JobStatus {
    const fn rank(self) -> u8 {
        match self {
            Self::Created => 0,
            Self::Validated => 1,
            Self::Mapped => 2,
            Self::Importing => 3,
            Self::Completed | Self::Failed => 4,
        }
    }

    /// Returns true for `Completed` and `Failed`
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the job may move from `self` to `next`.
    ///
    /// Every non-terminal stage may fail; otherwise only the next stage is
    /// reachable, and `Completed` only from `Importing`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Failed => true,
            _ => next.rank() == self.rank() + 1,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Validated => "validated",
            Self::Mapped => "mapped",
            Self::Importing => "importing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One file's trip through the pipeline.
#[derive(Debug)]
pub struct ImportJob {
    id: Uuid,
    file_meta: FileMeta,
    status: JobStatus,
    parsed: Option<ParsedFile>,
    mapping_session: Option<MappingSession>,
    confirmed: Option<ConfirmedMapping>,
    progress: ImportProgress,
    result: Option<ImportResult>,
    cancel: CancellationToken,
}

impl ImportJob {
    /// Creates a job for a selected file
    #[must_use]
    pub fn new(file_meta: FileMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_meta,
            status: JobStatus::Created,
            parsed: None,
            mapping_session: None,
            confirmed: None,
            progress: ImportProgress::default(),
            result: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns the job id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the file metadata
    #[must_use]
    pub const fn file_meta(&self) -> &FileMeta {
        &self.file_meta
    }

    /// Returns the current status
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns the parsed file once validated
    #[must_use]
    pub const fn parsed(&self) -> Option<&ParsedFile> {
        self.parsed.as_ref()
    }

    /// Returns the mapping session once validated
    #[must_use]
    pub const fn mapping_session(&self) -> Option<&MappingSession> {
        self.mapping_session.as_ref()
    }

    /// Returns the mapping session for editing; only while `Validated`
    pub fn mapping_session_mut(&mut self) -> Option<&mut MappingSession> {
        if self.status == JobStatus::Validated {
            self.mapping_session.as_mut()
        } else {
            None
        }
    }

    /// Returns the confirmed mapping once `Mapped`
    #[must_use]
    pub const fn confirmed_mapping(&self) -> Option<&ConfirmedMapping> {
        self.confirmed.as_ref()
    }

    /// Returns the last reported progress
    #[must_use]
    pub const fn progress(&self) -> &ImportProgress {
        &self.progress
    }

    /// Returns the terminal result, if the job has finished
    #[must_use]
    pub const fn result(&self) -> Option<&ImportResult> {
        self.result.as_ref()
    }

    /// Returns a token that cancels this job between batches
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn advance(&mut self, next: JobStatus) -> Result<(), ImportError> {
        if !self.status.can_advance_to(next) {
            return Err(ImportError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        tracing::debug!(job_id = %self.id, from = %self.status, to = %next, "Job status change");
        self.status = next;
        Ok(())
    }

    fn fail(&mut self, error: &ImportError, partial: Option<&ImportReport>) {
        self.status = JobStatus::Failed;
        self.result = Some(match partial {
            Some(report) => ImportResult::aborted(error, report.processed_count, report.error_count),
            None => ImportResult::failed(error),
        });
    }

    /// Checks the file, parses it and opens a mapping session.
    ///
    /// # Errors
    ///
    /// Returns the intake or parse failure; the job is then `Failed`.
    pub fn validate(
        &mut self,
        text: &str,
        intake: &FileIntake,
        parser: &DelimitedParser,
        catalog: &FieldMapCatalog,
    ) -> Result<(), ImportError> {
        if self.status != JobStatus::Created {
            return Err(ImportError::InvalidTransition {
                from: self.status,
                to: JobStatus::Validated,
            });
        }

        let parsed = intake
            .validate(&self.file_meta)
            .and_then(|()| {
                let _span =
                    crate::trace_operation_debug!(span_names::IMPORT_PARSE, file = %self.file_meta.name)
                        .entered();
                parser.parse(text)
            })
            .map_err(ImportError::from);

        match parsed {
            Ok(parsed) => {
                let suggested = catalog.suggest(&parsed.headers);
                self.mapping_session = Some(MappingSession::begin(&suggested, &parsed.headers));
                self.progress = ImportProgress::new(0, parsed.row_count(), None);
                self.parsed = Some(parsed);
                self.advance(JobStatus::Validated)
            }
            Err(e) => {
                tracing::warn!(job_id = %self.id, error = %e, "File rejected");
                self.fail(&e, None);
                Err(e)
            }
        }
    }

    /// Confirms the current mapping.
    ///
    /// A rejected mapping leaves the job `Validated` so it can be corrected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the job is `Validated`, or the
    /// confirmation error from [`MappingSession::confirm`].
    pub fn confirm_mapping(&mut self, reject_duplicate_targets: bool) -> Result<(), ImportError> {
        let session = match (&self.mapping_session, self.status) {
            (Some(session), JobStatus::Validated) => session,
            _ => {
                return Err(ImportError::InvalidTransition {
                    from: self.status,
                    to: JobStatus::Mapped,
                });
            }
        };
        self.confirmed = Some(session.confirm(reject_duplicate_targets)?);
        self.advance(JobStatus::Mapped)
    }
}

/// Observable state of the job a controller is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobState {
    /// Job id
    pub job_id: Uuid,
    /// Current status
    pub status: JobStatus,
    /// Latest progress
    pub progress: ImportProgress,
    /// Terminal result, once reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ImportResult>,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct JobOutcome {
    /// Terminal wire result
    pub result: ImportResult,
    /// Detailed counts and messages
    pub report: ImportReport,
    /// The error that failed the job, if any
    pub error: Option<ImportError>,
}

impl JobOutcome {
    /// Returns true if the job completed
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.success
    }
}

/// Forwards progress to the caller and to the controller's watch channel.
struct PublishingReporter<'a> {
    inner: Option<&'a dyn ProgressReporter>,
    state: &'a watch::Sender<Option<JobState>>,
}

impl ProgressReporter for PublishingReporter<'_> {
    fn report(&self, progress: &ImportProgress) {
        self.state.send_modify(|state| {
            if let Some(state) = state {
                state.progress = progress.clone();
            }
        });
        if let Some(inner) = self.inner {
            inner.report(progress);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.inner.is_some_and(ProgressReporter::is_cancelled)
    }
}

/// Prepares and runs import jobs, one at a time.
#[derive(Debug)]
pub struct ImportController {
    settings: ImportSettings,
    catalog: FieldMapCatalog,
    lock: Mutex<()>,
    state: watch::Sender<Option<JobState>>,
}

impl ImportController {
    /// Creates a controller with the built-in catalog
    #[must_use]
    pub fn new(settings: ImportSettings) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            settings: settings.validated(),
            catalog: FieldMapCatalog::builtin(),
            lock: Mutex::new(()),
            state,
        }
    }

    /// Replaces the header catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: FieldMapCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Returns the active settings
    #[must_use]
    pub const fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Returns the header catalog
    #[must_use]
    pub const fn catalog(&self) -> &FieldMapCatalog {
        &self.catalog
    }

    /// Subscribes to the state of the running (or last) job
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<JobState>> {
        self.state.subscribe()
    }

    /// Returns true while a job is running
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// Creates a job from in-memory text and validates it.
    ///
    /// # Errors
    ///
    /// Returns the intake or parse failure.
    pub fn prepare(&self, file_meta: FileMeta, text: &str) -> Result<ImportJob, ImportError> {
        let mut job = ImportJob::new(file_meta);
        job.validate(
            text,
            &FileIntake::from_settings(&self.settings),
            &DelimitedParser::from_settings(&self.settings),
            &self.catalog,
        )?;
        Ok(job)
    }

    /// Creates a job from a file on disk and validates it.
    ///
    /// Size and type are checked before the content is read. Invalid UTF-8
    /// is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file cannot be read, or the intake or parse failure.
    pub async fn prepare_path(&self, path: &Path) -> Result<ImportJob, ImportError> {
        let (file_meta, text) = self.read_checked(path).await?;
        self.prepare(file_meta, &text)
    }

    /// Reads only the header row of a file and opens a mapping session for it.
    ///
    /// Intake checks run as in [`prepare_path`](Self::prepare_path); data rows
    /// are neither parsed nor counted.
    ///
    /// # Errors
    ///
    /// Returns `Read` if the file cannot be read, the intake failure, or
    /// `EmptyFile` if the file has no non-blank line.
    pub async fn suggest_path(&self, path: &Path) -> Result<MappingSession, ImportError> {
        let (_, text) = self.read_checked(path).await?;
        Ok(self.suggest_text(&text)?)
    }

    /// Opens a mapping session from the header row of in-memory text.
    ///
    /// # Errors
    ///
    /// Returns `EmptyFile` if the text has no non-blank line.
    pub fn suggest_text(&self, text: &str) -> Result<MappingSession, FileValidationError> {
        let headers = extract_headers(text, self.settings.max_header_len);
        if headers.is_empty() {
            return Err(FileValidationError::EmptyFile);
        }
        Ok(MappingSession::begin(&self.catalog.suggest(&headers), &headers))
    }

    async fn read_checked(&self, path: &Path) -> Result<(FileMeta, String), ImportError> {
        let file_meta = FileMeta::from_path(path)?;
        FileIntake::from_settings(&self.settings).validate(&file_meta)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok((file_meta, String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Runs a prepared job to a terminal state.
    ///
    /// A `Validated` job has its mapping confirmed first. Authentication is
    /// checked before any row is touched. The job always ends `Completed` or
    /// `Failed` with a result.
    ///
    /// # Errors
    ///
    /// Returns `JobInProgress` if another job holds the lock, or
    /// `InvalidTransition` if the job is not ready to run. The job is left
    /// untouched in both cases.
    pub async fn run(
        &self,
        job: &mut ImportJob,
        store: &dyn RecordStore,
        authenticated: bool,
        progress: Option<&dyn ProgressReporter>,
    ) -> Result<JobOutcome, ImportError> {
        let Ok(_guard) = self.lock.try_lock() else {
            return Err(ImportError::JobInProgress);
        };
        if !matches!(job.status, JobStatus::Validated | JobStatus::Mapped) {
            return Err(ImportError::InvalidTransition {
                from: job.status,
                to: JobStatus::Importing,
            });
        }

        let span = crate::trace_operation!(
            span_names::IMPORT_EXECUTE,
            job_id = %job.id,
            file = %job.file_meta.name,
            total = job.progress.total
        );
        let outcome = self
            .execute(job, store, authenticated, progress)
            .instrument(span)
            .await;

        self.publish(job);
        Ok(outcome)
    }

    async fn execute(
        &self,
        job: &mut ImportJob,
        store: &dyn RecordStore,
        authenticated: bool,
        progress: Option<&dyn ProgressReporter>,
    ) -> JobOutcome {
        self.publish(job);

        if !authenticated {
            return Self::fail_early(job, ImportError::AuthenticationRequired);
        }
        if job.status == JobStatus::Validated
            && let Err(e) = job.confirm_mapping(self.settings.reject_duplicate_targets)
        {
            return Self::fail_early(job, e);
        }
        let (Some(parsed), Some(confirmed)) = (job.parsed.as_ref(), job.confirmed.as_ref()) else {
            return Self::fail_early(job, ImportError::EmptyMapping);
        };

        let transformer = RecordTransformer::new(&parsed.headers, confirmed);
        let importer =
            BatchImporter::from_settings(&self.settings).with_cancellation(job.cancel.clone());

        if let Err(e) = job.advance(JobStatus::Importing) {
            return Self::fail_early(job, e);
        }
        self.publish(job);
        tracing::info!(total = job.progress.total, "Import started");

        let Some(parsed) = job.parsed.as_ref() else {
            return Self::fail_early(job, ImportError::EmptyMapping);
        };
        let reporter = PublishingReporter {
            inner: progress,
            state: &self.state,
        };
        let batch = importer
            .process_rows(&parsed.rows, &transformer, store, Some(&reporter))
            .await;

        if let Some(latest) = self.state.borrow().as_ref() {
            job.progress = latest.progress.clone();
        }

        let report = batch.report;
        match batch.abort {
            None => {
                let result = ImportResult::completed(report.processed_count, report.error_count);
                job.status = JobStatus::Completed;
                job.result = Some(result.clone());
                tracing::info!(
                    processed = report.processed_count,
                    errors = report.error_count,
                    "Import completed"
                );
                JobOutcome {
                    result,
                    report,
                    error: None,
                }
            }
            Some(error) => {
                job.fail(&error, Some(&report));
                tracing::error!(
                    processed = report.processed_count,
                    errors = report.error_count,
                    error = %error,
                    "Import failed"
                );
                JobOutcome {
                    result: ImportResult::aborted(&error, report.processed_count, report.error_count),
                    report,
                    error: Some(error),
                }
            }
        }
    }

    fn fail_early(job: &mut ImportJob, error: ImportError) -> JobOutcome {
        tracing::warn!(error = %error, "Import rejected before processing");
        job.fail(&error, None);
        JobOutcome {
            result: ImportResult::failed(&error),
            report: ImportReport::new(),
            error: Some(error),
        }
    }

    fn publish(&self, job: &ImportJob) {
        self.state.send_replace(Some(JobState {
            job_id: job.id,
            status: job.status,
            progress: job.progress.clone(),
            result: job.result.clone(),
        }));
    }
}

impl Default for ImportController {
    fn default() -> Self {
        Self::new(ImportSettings::default())
    }
}
