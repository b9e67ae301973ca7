//! Property-based tests for value sanitization and record transformation

use proptest::prelude::*;
use phadir_core::import::{MappingSession, RawRow, RecordTransformer, sanitize};
use phadir_core::models::{CanonicalField, FieldMapping};

const STRIPPED: &[char] = &['<', '>', '"', '\'', '\0'];

fn arb_raw_value() -> impl Strategy<Value = String> {
    "[ a-zA-Z0-9<>\"'\\x00@.,-]{0,80}"
}

fn arb_field() -> impl Strategy<Value = CanonicalField> {
    prop::sample::select(CanonicalField::all().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sanitized values never carry markup characters and respect the cap
    #[test]
    fn sanitized_values_are_clean_and_bounded(raw in arb_raw_value(), max_len in 1usize..60) {
        if let Some(clean) = sanitize(Some(&raw), max_len) {
            prop_assert!(!clean.contains(STRIPPED));
            prop_assert!(clean.chars().count() <= max_len);
            prop_assert!(!clean.starts_with(char::is_whitespace));
            prop_assert!(!clean.is_empty());
        }
    }

    /// Sanitizing twice changes nothing when the value fits the cap
    #[test]
    fn sanitize_is_idempotent_within_cap(raw in arb_raw_value()) {
        let once = sanitize(Some(&raw), 500);
        let twice = sanitize(once.as_deref(), 500);
        prop_assert_eq!(once, twice);
    }

    /// Every field of a transformed record fits that field's maximum length
    #[test]
    fn transformed_fields_fit_their_limits(
        values in prop::collection::vec("[a-z ]{1,600}", 7),
    ) {
        let headers: Vec<String> = CanonicalField::all().iter().map(|f| f.as_str().to_string()).collect();
        let mappings: Vec<FieldMapping> = CanonicalField::all()
            .iter()
            .map(|f| FieldMapping::new(f.as_str(), *f))
            .collect();
        let confirmed = MappingSession::begin(&mappings, &headers).confirm(false).unwrap();
        let transformer = RecordTransformer::new(&headers, &confirmed);
        let row = RawRow::new(1, values.into_iter().map(Some).collect());

        if let Ok(out) = transformer.transform(&row) {
            for field in CanonicalField::all() {
                if let Some(value) = out.record.get(*field) {
                    prop_assert!(value.chars().count() <= field.max_len());
                }
            }
        }
    }

    /// Mapping the same column to any field twice gives that field the later value
    #[test]
    fn later_mapping_wins(field in arb_field(), first in "[a-z]{1,10}", second in "[a-z]{1,10}") {
        let headers = vec!["NAME".to_string(), "A".to_string(), "B".to_string()];
        let mut mappings = vec![FieldMapping::new("A", field), FieldMapping::new("B", field)];
        if field != CanonicalField::Name {
            mappings.insert(0, FieldMapping::new("NAME", CanonicalField::Name));
        }
        let confirmed = MappingSession::begin(&mappings, &headers).confirm(false).unwrap();
        let transformer = RecordTransformer::new(&headers, &confirmed);
        let row = RawRow::new(1, vec![Some("Agency".to_string()), Some(first), Some(second.clone())]);

        let out = transformer.transform(&row).unwrap();
        prop_assert_eq!(out.record.get(field), Some(second.as_str()));
    }
}
