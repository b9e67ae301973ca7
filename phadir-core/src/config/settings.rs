//! Import settings.

use serde::{Deserialize, Serialize};

/// Default maximum input file size (50 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Default ceiling on data rows per file
pub const DEFAULT_MAX_ROWS: usize = 100_000;

/// Default number of rows per batch
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Default pause between batches in milliseconds
pub const DEFAULT_BATCH_PAUSE_MS: u64 = 100;

/// Default record error threshold; a job aborts once errors exceed it
pub const DEFAULT_MAX_ERRORS: usize = 50;

/// Default header cell length cap in characters
pub const DEFAULT_MAX_HEADER_LEN: usize = 100;

/// Default data cell length cap in characters
pub const DEFAULT_MAX_CELL_LEN: usize = 500;

/// Tunables for file intake, parsing and batch execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Maximum accepted file size in bytes
    pub max_file_size_bytes: u64,
    /// Maximum number of data rows (header excluded)
    pub max_rows: usize,
    /// Rows per batch
    pub batch_size: usize,
    /// Pause between batches in milliseconds
    pub batch_pause_ms: u64,
    /// Number of accumulated record errors tolerated before abort
    pub max_errors: usize,
    /// Header cells are truncated to this many characters
    pub max_header_len: usize,
    /// Data cells are truncated to this many characters
    pub max_cell_len: usize,
    /// Reject confirmation when two enabled columns target the same field
    pub reject_duplicate_targets: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
            max_rows: DEFAULT_MAX_ROWS,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_pause_ms: DEFAULT_BATCH_PAUSE_MS,
            max_errors: DEFAULT_MAX_ERRORS,
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            max_cell_len: DEFAULT_MAX_CELL_LEN,
            reject_duplicate_targets: false,
        }
    }
}

impl ImportSettings {
    /// Creates settings with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps values that would make the pipeline unusable
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.batch_size = self.batch_size.max(1);
        self.max_header_len = self.max_header_len.max(1);
        self.max_cell_len = self.max_cell_len.max(1);
        self
    }

    /// Sets the batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Sets the pause between batches
    #[must_use]
    pub const fn with_batch_pause_ms(mut self, pause_ms: u64) -> Self {
        self.batch_pause_ms = pause_ms;
        self
    }

    /// Sets the record error threshold
    #[must_use]
    pub const fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Sets the data row ceiling
    #[must_use]
    pub const fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Enables or disables strict duplicate-target checking
    #[must_use]
    pub const fn with_reject_duplicate_targets(mut self, reject: bool) -> Self {
        self.reject_duplicate_targets = reject;
        self
    }
}
