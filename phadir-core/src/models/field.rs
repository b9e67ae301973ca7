//! Canonical field registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A target attribute that a source column may be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    /// Natural key assigned by the housing authority registry
    Code,
    /// Agency name (required)
    Name,
    /// Postal address
    Address,
    /// Contact phone number
    Phone,
    /// General contact email
    Email,
    /// Executive director email
    ExecDirEmail,
    /// Program type (e.g. "Section 8", "Combined")
    ProgramType,
}

impl CanonicalField {
    /// Returns all canonical fields in display order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Code,
            Self::Name,
            Self::Address,
            Self::Phone,
            Self::Email,
            Self::ExecDirEmail,
            Self::ProgramType,
        ]
    }

    /// Returns the wire name of the field
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Name => "name",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::ExecDirEmail => "execDirEmail",
            Self::ProgramType => "programType",
        }
    }

    /// Returns a human-readable label
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Code => "PHA Code",
            Self::Name => "Name",
            Self::Address => "Address",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::ExecDirEmail => "Executive Director Email",
            Self::ProgramType => "Program Type",
        }
    }

    /// Maximum stored length in characters after sanitizing
    #[must_use]
    pub const fn max_len(&self) -> usize {
        match self {
            Self::Code => 50,
            Self::Name | Self::Email | Self::ExecDirEmail => 255,
            Self::Address => 500,
            Self::Phone => 20,
            Self::ProgramType => 100,
        }
    }

    /// Returns true if a record cannot exist without this field
    #[must_use]
    pub const fn is_required(&self) -> bool {
        matches!(self, Self::Name)
    }

    /// Returns true if values are expected to look like an email address
    #[must_use]
    pub const fn is_email(&self) -> bool {
        matches!(self, Self::Email | Self::ExecDirEmail)
    }

    /// Returns the required fields
    pub fn required() -> impl Iterator<Item = Self> {
        Self::all().iter().copied().filter(Self::is_required)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a field name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}' (expected one of: code, name, address, phone, email, execDirEmail, programType)")]
pub struct UnknownFieldError(pub String);

impl FromStr for CanonicalField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "code" => Ok(Self::Code),
            "name" => Ok(Self::Name),
            "address" => Ok(Self::Address),
            "phone" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "execdiremail" => Ok(Self::ExecDirEmail),
            "programtype" => Ok(Self::ProgramType),
            _ => Err(UnknownFieldError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_name_is_required() {
        let required: Vec<_> = CanonicalField::required().collect();
        assert_eq!(required, vec![CanonicalField::Name]);
    }

    #[test]
    fn max_lengths() {
        assert_eq!(CanonicalField::Code.max_len(), 50);
        assert_eq!(CanonicalField::Name.max_len(), 255);
        assert_eq!(CanonicalField::Address.max_len(), 500);
        assert_eq!(CanonicalField::Phone.max_len(), 20);
        assert_eq!(CanonicalField::Email.max_len(), 255);
        assert_eq!(CanonicalField::ExecDirEmail.max_len(), 255);
        assert_eq!(CanonicalField::ProgramType.max_len(), 100);
    }

    #[test]
    fn parse_accepts_wire_and_snake_case() {
        assert_eq!("execDirEmail".parse(), Ok(CanonicalField::ExecDirEmail));
        assert_eq!("exec_dir_email".parse(), Ok(CanonicalField::ExecDirEmail));
        assert_eq!("PROGRAM-TYPE".parse(), Ok(CanonicalField::ProgramType));
        assert_eq!(" name ".parse(), Ok(CanonicalField::Name));
        assert!("city".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&CanonicalField::ExecDirEmail).unwrap();
        assert_eq!(json, "\"execDirEmail\"");
        for field in CanonicalField::all() {
            assert_eq!(field.to_string().parse::<CanonicalField>(), Ok(*field));
        }
    }
}
