//! Header recognition and mapping suggestions.
//!
//! Headers are normalized (trimmed, uppercased) and matched in two steps,
//! strictly in this order:
//!
//! 1. the exclusion rules: a header containing any excluded fragment is never
//!    auto-mapped (keeps `CITY`, `STATE`, `ZIP` columns away from `address`);
//! 2. the synonym table: exact match on the normalized header.
//!
//! Anything else stays unmapped. Secondary columns such as `ADDRESS_LINE_2`
//! or `PHONE_EXT` must not be suggested, since a later mapping to the same
//! field overwrites the primary value.

use std::collections::HashMap;

use crate::models::{CanonicalField, FieldMapping};

/// Known header spellings, many-to-one onto canonical fields
pub const HEADER_SYNONYMS: &[(&str, CanonicalField)] = &[
    // code
    ("CODE", CanonicalField::Code),
    ("PHA_CODE", CanonicalField::Code),
    ("PHA CODE", CanonicalField::Code),
    ("HA_CODE", CanonicalField::Code),
    ("PARTICIPANT_CODE", CanonicalField::Code),
    ("PARTICIPANT CODE", CanonicalField::Code),
    ("AGENCY_CODE", CanonicalField::Code),
    ("AGENCY CODE", CanonicalField::Code),
    // name
    ("NAME", CanonicalField::Name),
    ("PHA_NAME", CanonicalField::Name),
    ("PHA NAME", CanonicalField::Name),
    ("HA_NAME", CanonicalField::Name),
    ("AGENCY_NAME", CanonicalField::Name),
    ("AGENCY NAME", CanonicalField::Name),
    ("PARTICIPANT_NAME", CanonicalField::Name),
    ("FORMAL_PARTICIPANT_NAME", CanonicalField::Name),
    ("FORMAL PARTICIPANT NAME", CanonicalField::Name),
    // address
    ("ADDRESS", CanonicalField::Address),
    ("FULL_ADDRESS", CanonicalField::Address),
    ("FULL ADDRESS", CanonicalField::Address),
    ("STD_ADDR", CanonicalField::Address),
    ("MAILING_ADDRESS", CanonicalField::Address),
    ("STREET_ADDRESS", CanonicalField::Address),
    ("HA_ADDRESS", CanonicalField::Address),
    // phone
    ("PHONE", CanonicalField::Phone),
    ("PHONE_NUMBER", CanonicalField::Phone),
    ("PHONE NUMBER", CanonicalField::Phone),
    ("TELEPHONE", CanonicalField::Phone),
    ("HA_PHN_NUM", CanonicalField::Phone),
    ("CONTACT_PHONE", CanonicalField::Phone),
    // email
    ("EMAIL", CanonicalField::Email),
    ("E-MAIL", CanonicalField::Email),
    ("EMAIL_ADDRESS", CanonicalField::Email),
    ("HA_EMAIL_ADDR_TEXT", CanonicalField::Email),
    ("CONTACT_EMAIL", CanonicalField::Email),
    // execDirEmail
    ("EXEC_DIR_EMAIL", CanonicalField::ExecDirEmail),
    ("EXECUTIVE_DIRECTOR_EMAIL", CanonicalField::ExecDirEmail),
    ("EXECUTIVE DIRECTOR EMAIL", CanonicalField::ExecDirEmail),
    ("ED_EMAIL", CanonicalField::ExecDirEmail),
    // programType
    ("PROGRAM_TYPE", CanonicalField::ProgramType),
    ("PROGRAM TYPE", CanonicalField::ProgramType),
    ("HA_PROGRAM_TYPE", CanonicalField::ProgramType),
    ("PHA_PROGRAM_TYPE", CanonicalField::ProgramType),
    ("PROGRAM", CanonicalField::ProgramType),
];

/// Header fragments that block auto-mapping
pub const EXCLUDED_HEADER_PARTS: &[&str] = &["CITY", "STATE", "ZIP", "COUNTY", "FAX"];

/// Normalizes a header for lookup
#[must_use]
pub fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// Registry of header synonyms and exclusion rules.
#[derive(Debug, Clone)]
pub struct FieldMapCatalog {
    synonyms: HashMap<String, CanonicalField>,
    exclusions: Vec<String>,
}

impl FieldMapCatalog {
    /// Creates the catalog with the built-in tables
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            synonyms: HEADER_SYNONYMS
                .iter()
                .map(|(header, field)| (normalize_header(header), *field))
                .collect(),
            exclusions: EXCLUDED_HEADER_PARTS
                .iter()
                .map(|part| normalize_header(part))
                .collect(),
        }
    }

    /// Adds or replaces a synonym
    #[must_use]
    pub fn with_synonym(mut self, header: &str, field: CanonicalField) -> Self {
        self.synonyms.insert(normalize_header(header), field);
        self
    }

    /// Adds an excluded header fragment
    #[must_use]
    pub fn with_exclusion(mut self, fragment: &str) -> Self {
        self.exclusions.push(normalize_header(fragment));
        self
    }

    /// Returns true if the header must never be auto-mapped
    #[must_use]
    pub fn is_excluded(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        self.exclusions
            .iter()
            .any(|fragment| normalized.contains(fragment.as_str()))
    }

    /// Looks up the canonical field for a header, honoring exclusions first
    #[must_use]
    pub fn lookup(&self, header: &str) -> Option<CanonicalField> {
        if self.is_excluded(header) {
            return None;
        }
        self.synonyms.get(&normalize_header(header)).copied()
    }

    /// Suggests mappings for a header row.
    ///
    /// Only recognized headers are returned, in header order, all enabled.
    #[must_use]
    pub fn suggest(&self, headers: &[String]) -> Vec<FieldMapping> {
        let suggestions: Vec<FieldMapping> = headers
            .iter()
            .filter_map(|header| {
                self.lookup(header)
                    .map(|field| FieldMapping::new(header.clone(), field))
            })
            .collect();

        tracing::debug!(
            headers = headers.len(),
            suggested = suggestions.len(),
            "Suggested column mappings"
        );

        suggestions
    }

    /// Returns the known spellings for a field, sorted
    #[must_use]
    pub fn synonyms_for(&self, field: CanonicalField) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .synonyms
            .iter()
            .filter(|(_, f)| **f == field)
            .map(|(h, _)| h.as_str())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for FieldMapCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
