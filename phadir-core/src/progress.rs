//! Progress reporting and cancellation for long-running imports.
//!
//! Progress is advisory: reporters observe the job but never steer it.
//! Cancellation goes through `CancellationToken`, which the batch loop checks
//! before each batch.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Snapshot of how far an import has progressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    /// Rows handled so far
    pub current: usize,
    /// Rows in the file
    pub total: usize,
    /// Name of the record just handled, or a positional placeholder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_record_label: Option<String>,
}

impl ImportProgress {
    /// Creates a progress snapshot
    #[must_use]
    pub fn new(current: usize, total: usize, label: Option<String>) -> Self {
        Self {
            current,
            total,
            current_record_label: label,
        }
    }

    /// Returns completion as a fraction between 0.0 and 1.0
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Receives progress events from a running import.
pub trait ProgressReporter: Send + Sync {
    /// Called after every record
    fn report(&self, progress: &ImportProgress);

    /// Returns true if the observer asked the job to stop
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Reporter that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report(&self, _progress: &ImportProgress) {}
}

/// Reporter that forwards events to a closure.
pub struct CallbackProgressReporter<F>
where
    F: Fn(&ImportProgress) + Send + Sync,
{
    callback: F,
    cancel: CancellationToken,
}

impl<F> CallbackProgressReporter<F>
where
    F: Fn(&ImportProgress) + Send + Sync,
{
    /// Creates a reporter around the callback
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a token that cancels the job this reporter observes
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl<F> ProgressReporter for CallbackProgressReporter<F>
where
    F: Fn(&ImportProgress) + Send + Sync,
{
    fn report(&self, progress: &ImportProgress) {
        (self.callback)(progress);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Shared cancellation flag.
#[derive(Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new, uncancelled token
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Checks if cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clears the cancellation flag
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
