//! CLI error types and exit codes.

use phadir_core::error::{ConfigError, ImportError, StoreError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, file validation, mapping or IO errors
    pub const GENERAL_ERROR: i32 = 1;
    /// The import ran but failed or was aborted part way
    pub const IMPORT_FAILED: i32 = 2;
    /// No session token was supplied, or the store refused the write
    pub const AUTH_REQUIRED: i32 = 3;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The file or mapping was rejected before the import started
    #[error("Validation error: {0}")]
    Validation(String),

    /// The import ran and ended in failure
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// Authentication required
    #[error("Authentication required: pass --token or set PHADIR_AUTH_TOKEN")]
    AuthRequired,

    /// Record store error
    #[error("Store error: {0}")]
    Store(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImportError> for CliError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::AuthenticationRequired => Self::AuthRequired,
            ImportError::TooManyErrors { .. }
            | ImportError::Persistence(_)
            | ImportError::Cancelled => Self::ImportFailed(err.to_string()),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unauthorized => Self::AuthRequired,
            other => Self::Store(other.to_string()),
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, validation, store, IO)
    /// - 2: Import failed or aborted
    /// - 3: Authentication required
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ImportFailed(_) => exit_codes::IMPORT_FAILED,
            Self::AuthRequired => exit_codes::AUTH_REQUIRED,
            Self::Config(_) | Self::Validation(_) | Self::Store(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
