//! Canonical PHA contact record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CanonicalField;

/// A sanitized PHA contact record ready for persistence.
///
/// The name is guaranteed non-blank: [`CanonicalRecord::new`] and
/// deserialization both reject blank names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecordFields")]
pub struct CanonicalRecord {
    name: String,
    /// Natural key, if the source provided one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Executive director email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_dir_email: Option<String>,
    /// Program type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_type: Option<String>,
    /// When the record was last written by an import
    pub updated_at: DateTime<Utc>,
}

/// Error for a stored record whose name is blank
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record name must not be blank")]
pub struct BlankNameError;

/// Unchecked wire shape of a record
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordFields {
    name: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    exec_dir_email: Option<String>,
    #[serde(default)]
    program_type: Option<String>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RecordFields> for CanonicalRecord {
    type Error = BlankNameError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        let mut record = Self::new(fields.name).ok_or(BlankNameError)?;
        record.code = fields.code;
        record.address = fields.address;
        record.phone = fields.phone;
        record.email = fields.email;
        record.exec_dir_email = fields.exec_dir_email;
        record.program_type = fields.program_type;
        record.updated_at = fields.updated_at;
        Ok(record)
    }
}

impl CanonicalRecord {
    /// Creates a record with the given name, or `None` if the name is blank.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self {
            name,
            code: None,
            address: None,
            phone: None,
            email: None,
            exec_dir_email: None,
            program_type: None,
            updated_at: Utc::now(),
        })
    }

    /// Returns the record name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value stored for a field
    #[must_use]
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Name => Some(self.name.as_str()),
            CanonicalField::Code => self.code.as_deref(),
            CanonicalField::Address => self.address.as_deref(),
            CanonicalField::Phone => self.phone.as_deref(),
            CanonicalField::Email => self.email.as_deref(),
            CanonicalField::ExecDirEmail => self.exec_dir_email.as_deref(),
            CanonicalField::ProgramType => self.program_type.as_deref(),
        }
    }

    /// Sets an optional field. The name cannot be changed through this method.
    pub fn set(&mut self, field: CanonicalField, value: Option<String>) {
        match field {
            CanonicalField::Name => {}
            CanonicalField::Code => self.code = value,
            CanonicalField::Address => self.address = value,
            CanonicalField::Phone => self.phone = value,
            CanonicalField::Email => self.email = value,
            CanonicalField::ExecDirEmail => self.exec_dir_email = value,
            CanonicalField::ProgramType => self.program_type = value,
        }
    }

    /// Returns the natural key if present and non-blank
    #[must_use]
    pub fn natural_key(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
