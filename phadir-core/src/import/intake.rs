//! Pre-parse file validation.
//!
//! Intake only looks at file metadata: size, extension and declared type.
//! The row ceiling is enforced by the parser once the content is read.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ImportSettings;
use crate::error::{FileValidationError, ImportError};

/// Extensions accepted regardless of declared type
pub const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Declared content types accepted regardless of extension
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &["text/csv", "application/vnd.ms-excel", "text/plain"];

/// Metadata about a user-supplied file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    /// File name as supplied by the user
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Content type declared by the caller, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
}

impl FileMeta {
    /// Creates file metadata
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, declared_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            size,
            declared_type,
        }
    }

    /// Reads metadata for a file on disk.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Read` if the file metadata cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let metadata = std::fs::metadata(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, metadata.len(), None))
    }

    /// Sets the declared content type
    #[must_use]
    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    /// Returns the lowercase extension of the file name, if any
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Validates files before they are parsed.
#[derive(Debug, Clone, Copy)]
pub struct FileIntake {
    max_size: u64,
}

impl FileIntake {
    /// Creates an intake check with the given size limit
    #[must_use]
    pub const fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    /// Creates an intake check from settings
    #[must_use]
    pub const fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(settings.max_file_size_bytes)
    }

    /// Returns the configured size limit
    #[must_use]
    pub const fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Checks size and type. Has no side effects.
    ///
    /// # Errors
    ///
    /// Returns `FileTooLarge` or `UnsupportedType`.
    pub fn validate(&self, file: &FileMeta) -> Result<(), FileValidationError> {
        if file.size > self.max_size {
            return Err(FileValidationError::FileTooLarge {
                size: file.size,
                limit: self.max_size,
            });
        }

        if !is_accepted_type(file) {
            let described = file
                .declared_type
                .clone()
                .or_else(|| file.extension().map(|e| format!(".{e}")))
                .unwrap_or_else(|| file.name.clone());
            return Err(FileValidationError::UnsupportedType(described));
        }

        Ok(())
    }
}

impl Default for FileIntake {
    fn default() -> Self {
        Self::from_settings(&ImportSettings::default())
    }
}

fn is_accepted_type(file: &FileMeta) -> bool {
    let by_extension = file
        .extension()
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()));
    let by_declared_type = file.declared_type.as_deref().is_some_and(|declared| {
        // Ignore parameters such as "; charset=utf-8"
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        ACCEPTED_CONTENT_TYPES.contains(&essence.as_str())
    });
    by_extension || by_declared_type
}
