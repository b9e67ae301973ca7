//! Turns raw rows into canonical records.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{CanonicalField, CanonicalRecord};

use super::parser::RawRow;
use super::result::{RecordError, RecordWarning};
use super::session::ConfirmedMapping;

/// Loose email shape: something, `@`, something, `.`, something
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("EMAIL_REGEX is a valid regex pattern"));

/// Characters removed from every value
const STRIPPED_CHARS: &[char] = &['<', '>', '"', '\'', '\0'];

/// Cleans a cell value for storage.
///
/// Strips markup and quote characters and NUL bytes, trims, then truncates to
/// `max_len` characters. Values that end up empty become `None`.
#[must_use]
pub fn sanitize(value: Option<&str>, max_len: usize) -> Option<String> {
    let value = value?;
    let stripped: String = value.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();
    let truncated: String = stripped.trim().chars().take(max_len).collect();
    if truncated.is_empty() {
        None
    } else {
        Some(truncated)
    }
}

/// Returns true if the value looks like an email address
#[must_use]
pub fn is_plausible_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// A record plus the non-fatal issues found while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRecord {
    /// The sanitized record
    pub record: CanonicalRecord,
    /// Soft validation warnings
    pub warnings: Vec<RecordWarning>,
}

/// Applies a confirmed mapping to rows of one file.
///
/// Column positions are resolved once; mappings whose source column is not
/// among the headers are ignored.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    bindings: Vec<(usize, CanonicalField)>,
}

impl RecordTransformer {
    /// Resolves the mapping against the file's headers
    #[must_use]
    pub fn new(headers: &[String], mapping: &ConfirmedMapping) -> Self {
        let bindings = mapping
            .mappings()
            .iter()
            .filter_map(|m| {
                let field = m.target_field?;
                let index = headers.iter().position(|h| *h == m.source_column);
                if index.is_none() {
                    tracing::warn!(column = %m.source_column, "Mapped column not found in headers");
                }
                index.map(|i| (i, field))
            })
            .collect();
        Self { bindings }
    }

    /// Returns the resolved `(column index, field)` pairs in declared order
    #[must_use]
    pub fn bindings(&self) -> &[(usize, CanonicalField)] {
        &self.bindings
    }

    /// Builds a canonical record from a row.
    ///
    /// Mappings are applied in declared order; a later mapping to the same
    /// field overwrites an earlier one, even with an empty value.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::MissingRequiredField` if the name is blank.
    pub fn transform(&self, row: &RawRow) -> Result<TransformedRecord, RecordError> {
        let mut values: BTreeMap<CanonicalField, Option<String>> = BTreeMap::new();
        for (index, field) in &self.bindings {
            values.insert(*field, sanitize(row.get(*index), field.max_len()));
        }

        let name = values
            .remove(&CanonicalField::Name)
            .flatten()
            .ok_or(RecordError::MissingRequiredField(CanonicalField::Name))?;
        let mut record = CanonicalRecord::new(name)
            .ok_or(RecordError::MissingRequiredField(CanonicalField::Name))?;

        let mut warnings = Vec::new();
        for (field, value) in values {
            if field.is_email()
                && let Some(ref email) = value
                && !is_plausible_email(email)
            {
                warnings.push(RecordWarning::new(field, "invalid email format"));
            }
            record.set(field, value);
        }

        Ok(TransformedRecord { record, warnings })
    }

    /// Returns the sanitized name for progress labels, if the row has one
    #[must_use]
    pub fn label_for(&self, row: &RawRow) -> Option<String> {
        self.bindings
            .iter()
            .rev()
            .find(|(_, field)| *field == CanonicalField::Name)
            .and_then(|(index, field)| sanitize(row.get(*index), field.max_len()))
    }
}
