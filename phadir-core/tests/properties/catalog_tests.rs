//! Property-based tests for header mapping suggestions

use proptest::prelude::*;
use phadir_core::import::{FieldMapCatalog, MappingSession, catalog::EXCLUDED_HEADER_PARTS};

fn arb_header() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Z_ ]{1,20}",
        prop::sample::select(vec![
            "PHA_CODE", "PHA_NAME", "FULL_ADDRESS", "HA_PHN_NUM", "EMAIL", "EXEC_DIR_EMAIL",
            "PROGRAM_TYPE", "STD_CITY", "STD_ZIP", "NOTES",
        ])
        .prop_map(str::to_string),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Suggestions are an ordered subset of the headers, all enabled
    #[test]
    fn suggestions_follow_header_order(headers in prop::collection::vec(arb_header(), 0..15)) {
        let suggested = FieldMapCatalog::builtin().suggest(&headers);
        let mut cursor = 0;
        for mapping in &suggested {
            prop_assert!(mapping.enabled);
            prop_assert!(mapping.target_field.is_some());
            let position = headers[cursor..]
                .iter()
                .position(|h| *h == mapping.source_column);
            prop_assert!(position.is_some());
            cursor += position.unwrap_or(0) + 1;
        }
    }

    /// Headers containing an excluded fragment are never mapped
    #[test]
    fn excluded_headers_never_map(
        prefix in "[A-Z_]{0,8}",
        part in prop::sample::select(EXCLUDED_HEADER_PARTS.to_vec()),
        suffix in "(_ADDRESS|_EMAIL|_NAME|)",
    ) {
        let header = format!("{prefix}{part}{suffix}");
        prop_assert_eq!(FieldMapCatalog::builtin().lookup(&header), None);
    }

    /// A session has exactly one entry per header, whatever was suggested
    #[test]
    fn session_covers_every_header(headers in prop::collection::vec(arb_header(), 0..15)) {
        let suggested = FieldMapCatalog::builtin().suggest(&headers);
        let session = MappingSession::begin(&suggested, &headers);
        prop_assert_eq!(session.mappings().len(), headers.len());
        prop_assert_eq!(session.confirmed_mappings().len(), suggested.len());
    }
}
