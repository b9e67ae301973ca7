//! Core data structures shared across the import pipeline.

mod field;
mod mapping;
mod record;

pub use field::{CanonicalField, UnknownFieldError};
pub use mapping::FieldMapping;
pub use record::{BlankNameError, CanonicalRecord};
