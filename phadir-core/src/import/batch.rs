//! Chunked, sequential execution of an import.
//!
//! Rows are processed strictly in file order, one batch at a time, with a
//! short pause between batches. Per-row failures are collected; the run stops
//! once the accumulated errors exceed the configured threshold.

use std::time::Duration;

use tracing::Instrument;

use crate::config::ImportSettings;
use crate::config::settings::{DEFAULT_BATCH_PAUSE_MS, DEFAULT_BATCH_SIZE, DEFAULT_MAX_ERRORS};
use crate::error::{ImportError, StoreError};
use crate::progress::{CancellationToken, ImportProgress, ProgressReporter};
use crate::store::RecordStore;
use crate::tracing::span_names;

use super::parser::RawRow;
use super::result::{ImportReport, RecordError};
use super::transform::RecordTransformer;

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchImportResult {
    /// Counts and messages collected up to the point the run stopped
    pub report: ImportReport,
    /// Why the run stopped early, if it did
    pub abort: Option<ImportError>,
}

impl BatchImportResult {
    /// Returns true if every row was handled
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.abort.is_none()
    }
}

/// Runs transformed rows into a store in fixed-size batches.
#[derive(Debug, Clone)]
pub struct BatchImporter {
    batch_size: usize,
    batch_pause: Duration,
    max_errors: usize,
    cancel: CancellationToken,
}

impl BatchImporter {
    /// Creates an importer with the given batch size and default pause and threshold
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_pause: Duration::from_millis(DEFAULT_BATCH_PAUSE_MS),
            max_errors: DEFAULT_MAX_ERRORS,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates an importer from settings
    #[must_use]
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(settings.batch_size)
            .with_batch_pause(Duration::from_millis(settings.batch_pause_ms))
            .with_max_errors(settings.max_errors)
    }

    /// Sets the pause between batches
    #[must_use]
    pub const fn with_batch_pause(mut self, pause: Duration) -> Self {
        self.batch_pause = pause;
        self
    }

    /// Sets the error threshold; the run aborts once errors exceed it
    #[must_use]
    pub const fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Uses an externally owned cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns the configured batch size
    #[must_use]
    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the error threshold
    #[must_use]
    pub const fn max_errors(&self) -> usize {
        self.max_errors
    }

    /// Returns a handle that cancels this importer between batches
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns true if cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Processes all rows.
    ///
    /// Each row is transformed and written with an upsert. Progress is
    /// reported after every row. Cancellation is honored before each batch.
    /// A store `Unauthorized` ends the run with `AuthenticationRequired`.
    pub async fn process_rows(
        &self,
        rows: &[RawRow],
        transformer: &RecordTransformer,
        store: &dyn RecordStore,
        progress: Option<&dyn ProgressReporter>,
    ) -> BatchImportResult {
        let total = rows.len();
        let mut report = ImportReport::new();
        let check_cancelled =
            || self.is_cancelled() || progress.is_some_and(ProgressReporter::is_cancelled);

        for (batch_idx, chunk) in rows.chunks(self.batch_size).enumerate() {
            if check_cancelled() {
                tracing::info!(batch = batch_idx, "Import cancelled");
                report.cancelled = true;
                return BatchImportResult {
                    report,
                    abort: Some(ImportError::Cancelled),
                };
            }

            if batch_idx > 0 && !self.batch_pause.is_zero() {
                tokio::time::sleep(self.batch_pause).await;
            }

            let span = crate::trace_operation_debug!(
                span_names::IMPORT_BATCH,
                batch = batch_idx,
                rows = chunk.len()
            );
            let abort = self
                .process_batch(chunk, total, transformer, store, progress, &mut report)
                .instrument(span)
                .await;

            if let Some(err) = abort {
                tracing::error!(error = %err, "Import aborted");
                return BatchImportResult {
                    report,
                    abort: Some(err),
                };
            }
            report.batches_processed += 1;
        }

        BatchImportResult {
            report,
            abort: None,
        }
    }

    async fn process_batch(
        &self,
        chunk: &[RawRow],
        total: usize,
        transformer: &RecordTransformer,
        store: &dyn RecordStore,
        progress: Option<&dyn ProgressReporter>,
        report: &mut ImportReport,
    ) -> Option<ImportError> {
        for row in chunk {
            let number = row.number();
            let mut fatal = None;

            match transformer.transform(row) {
                Ok(transformed) => {
                    let upsert = store.upsert(transformed.record).instrument(
                        crate::trace_operation_debug!(span_names::STORE_UPSERT, row = number),
                    );
                    match upsert.await {
                        Ok(outcome) => {
                            report.record_success(outcome.is_update());
                            for warning in &transformed.warnings {
                                report.record_warning(number, warning);
                            }
                        }
                        Err(StoreError::Unauthorized) => {
                            report.record_failure(number, &RecordError::Unauthorized);
                            fatal = Some(ImportError::AuthenticationRequired);
                        }
                        Err(e) => {
                            tracing::warn!(row = number, error = %e, "Failed to save record");
                            report.record_failure(number, &RecordError::Persistence(e.to_string()));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(row = number, error = %e, "Skipping record");
                    report.record_failure(number, &e);
                }
            }

            if let Some(reporter) = progress {
                let label = transformer
                    .label_for(row)
                    .unwrap_or_else(|| format!("Record {number}"));
                reporter.report(&ImportProgress::new(
                    report.processed_count + report.error_count,
                    total,
                    Some(label),
                ));
            }

            if fatal.is_some() {
                return fatal;
            }
            if report.error_count > self.max_errors {
                return Some(ImportError::TooManyErrors {
                    limit: self.max_errors,
                    processed: report.processed_count,
                    errors: report.error_count,
                });
            }
        }

        tracing::debug!(
            processed = report.processed_count,
            errors = report.error_count,
            "Batch complete"
        );
        None
    }
}

impl Default for BatchImporter {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
