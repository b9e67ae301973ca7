//! Column-to-field mappings.

use serde::{Deserialize, Serialize};

use super::CanonicalField;

/// Binds one source column to a canonical field.
///
/// `target` is `None` for columns the catalog could not recognize and the
/// user has not assigned yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    /// Header text of the source column
    pub source_column: String,
    /// Canonical field receiving the column's values
    pub target_field: Option<CanonicalField>,
    /// Whether the mapping takes part in the import
    pub enabled: bool,
}

impl FieldMapping {
    /// Creates an enabled mapping to a target field
    #[must_use]
    pub fn new(source_column: impl Into<String>, target_field: CanonicalField) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: Some(target_field),
            enabled: true,
        }
    }

    /// Creates a disabled mapping with no target
    #[must_use]
    pub fn unmapped(source_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_field: None,
            enabled: false,
        }
    }

    /// Returns true if the mapping is enabled and has a target
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.enabled && self.target_field.is_some()
    }
}
