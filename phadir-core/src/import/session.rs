//! User-editable column mapping for a single file.
//!
//! A session is built fresh for every file from the catalog's suggestions and
//! the file's headers. It is never carried over to another file.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ImportError;
use crate::models::{CanonicalField, FieldMapping};

/// Outcome of the required-field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredFieldStatus {
    /// Required fields that no enabled mapping targets
    pub missing_required: Vec<CanonicalField>,
    /// True when nothing required is missing
    pub satisfied: bool,
}

/// A mapping set that passed confirmation.
///
/// Only `MappingSession::confirm` creates this, so holding one proves the
/// required-field gate was passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedMapping {
    mappings: Vec<FieldMapping>,
}

impl ConfirmedMapping {
    /// Returns the enabled mappings in declared order
    #[must_use]
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Returns the source column bound to a field; the last one when several are
    #[must_use]
    pub fn source_for(&self, field: CanonicalField) -> Option<&str> {
        self.mappings
            .iter()
            .rev()
            .find(|m| m.target_field == Some(field))
            .map(|m| m.source_column.as_str())
    }
}

/// Editable mapping state: one entry per header, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSession {
    mappings: Vec<FieldMapping>,
}

impl MappingSession {
    /// Starts a session for a file's headers.
    ///
    /// Headers with a suggestion start enabled with the suggested target;
    /// the rest start disabled and unmapped.
    #[must_use]
    pub fn begin(suggested: &[FieldMapping], headers: &[String]) -> Self {
        let mappings = headers
            .iter()
            .map(|header| {
                suggested
                    .iter()
                    .find(|s| &s.source_column == header)
                    .cloned()
                    .unwrap_or_else(|| FieldMapping::unmapped(header.clone()))
            })
            .collect();
        Self { mappings }
    }

    /// Returns every mapping, enabled or not
    #[must_use]
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Enables or disables the mapping for a header.
    ///
    /// Returns false if the header is not part of this session.
    pub fn toggle(&mut self, header: &str, enabled: bool) -> bool {
        let mut found = false;
        for mapping in self.mappings.iter_mut().filter(|m| m.source_column == header) {
            mapping.enabled = enabled;
            found = true;
        }
        found
    }

    /// Retargets a header. `Some` also enables it, `None` clears and disables it.
    ///
    /// Returns false if the header is not part of this session.
    pub fn set_target(&mut self, header: &str, target: Option<CanonicalField>) -> bool {
        let mut found = false;
        for mapping in self.mappings.iter_mut().filter(|m| m.source_column == header) {
            mapping.target_field = target;
            mapping.enabled = target.is_some();
            found = true;
        }
        found
    }

    /// Returns the enabled mappings that have a target, in declared order
    #[must_use]
    pub fn confirmed_mappings(&self) -> Vec<FieldMapping> {
        self.mappings
            .iter()
            .filter(|m| m.is_active())
            .cloned()
            .collect()
    }

    /// Checks a mapping set against the required fields
    #[must_use]
    pub fn required_field_status(confirmed: &[FieldMapping]) -> RequiredFieldStatus {
        let missing_required: Vec<CanonicalField> = CanonicalField::required()
            .filter(|field| {
                !confirmed
                    .iter()
                    .any(|m| m.is_active() && m.target_field == Some(*field))
            })
            .collect();
        RequiredFieldStatus {
            satisfied: missing_required.is_empty(),
            missing_required,
        }
    }

    /// Lists fields targeted by more than one enabled mapping
    #[must_use]
    pub fn duplicate_targets(&self) -> Vec<(CanonicalField, Vec<String>)> {
        let mut by_field: BTreeMap<CanonicalField, Vec<String>> = BTreeMap::new();
        for mapping in self.mappings.iter().filter(|m| m.is_active()) {
            if let Some(field) = mapping.target_field {
                by_field
                    .entry(field)
                    .or_default()
                    .push(mapping.source_column.clone());
            }
        }
        by_field
            .into_iter()
            .filter(|(_, columns)| columns.len() > 1)
            .collect()
    }

    /// Returns true if `confirm` would succeed without strict duplicate checks
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        let confirmed = self.confirmed_mappings();
        !confirmed.is_empty() && Self::required_field_status(&confirmed).satisfied
    }

    /// Confirms the session.
    ///
    /// With `reject_duplicate_targets`, two enabled columns bound to one field
    /// are an error; otherwise the later column wins during transformation.
    ///
    /// # Errors
    ///
    /// Returns `EmptyMapping`, `MappingIncomplete` or `DuplicateTargetMapping`.
    pub fn confirm(&self, reject_duplicate_targets: bool) -> Result<ConfirmedMapping, ImportError> {
        let confirmed = self.confirmed_mappings();
        if confirmed.is_empty() {
            return Err(ImportError::EmptyMapping);
        }

        let status = Self::required_field_status(&confirmed);
        if !status.satisfied {
            return Err(ImportError::MappingIncomplete {
                missing: status.missing_required,
            });
        }

        let duplicates = self.duplicate_targets();
        if let Some((field, columns)) = duplicates.first() {
            if reject_duplicate_targets {
                return Err(ImportError::DuplicateTargetMapping {
                    field: *field,
                    columns: columns.clone(),
                });
            }
            tracing::warn!(
                field = %field,
                columns = %columns.join(", "),
                "Several columns map to the same field; the last one wins"
            );
        }

        Ok(ConfirmedMapping {
            mappings: confirmed,
        })
    }
}
