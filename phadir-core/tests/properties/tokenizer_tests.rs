//! Property-based tests for delimiter detection and tokenization

use proptest::prelude::*;
use phadir_core::import::{Delimiter, detect_delimiter, normalize_cell, tokenize_line};

// ========== Strategies ==========

/// Field content that needs no quoting under either delimiter
fn arb_plain_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.@-]{0,20}"
}

/// Field content with delimiters, quotes and inner spaces
fn arb_messy_field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,\t\"]{0,24}"
}

fn arb_delimiter() -> impl Strategy<Value = Delimiter> {
    prop_oneof![Just(Delimiter::Comma), Just(Delimiter::Tab)]
}

/// Quotes a field the way spreadsheet exports do
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Case-scrambled null markers with optional padding
fn arb_null_marker() -> impl Strategy<Value = String> {
    ("[ \t]{0,3}", "[nN][aA][nN]|[nN][uU][lL][lL]|", "[ \t]{0,3}")
        .prop_map(|(lead, word, tail)| format!("{lead}{word}{tail}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========== Tokenization ==========

    /// Joining plain fields and tokenizing gives the fields back
    #[test]
    fn plain_fields_round_trip(
        fields in prop::collection::vec(arb_plain_field(), 1..12),
        delimiter in arb_delimiter(),
    ) {
        let line = fields.join(&delimiter.as_char().to_string());
        prop_assert_eq!(tokenize_line(&line, delimiter), fields);
    }

    /// Quoted fields keep embedded delimiters and doubled quotes, trimmed
    #[test]
    fn quoted_fields_survive_tokenization(
        fields in prop::collection::vec(arb_messy_field(), 1..8),
        delimiter in arb_delimiter(),
    ) {
        let line = fields
            .iter()
            .map(|f| quote(f))
            .collect::<Vec<_>>()
            .join(&delimiter.as_char().to_string());
        let expected: Vec<String> = fields.iter().map(|f| f.trim().to_string()).collect();
        prop_assert_eq!(tokenize_line(&line, delimiter), expected);
    }

    /// The number of tokens is one more than the unquoted delimiters
    #[test]
    fn token_count_follows_unquoted_delimiters(
        fields in prop::collection::vec(arb_messy_field(), 1..8),
    ) {
        let line = fields.iter().map(|f| quote(f)).collect::<Vec<_>>().join(",");
        prop_assert_eq!(tokenize_line(&line, Delimiter::Comma).len(), fields.len());
    }

    // ========== Delimiter detection ==========

    /// Commas inside quoted headers never outvote tabs
    #[test]
    fn quoted_commas_do_not_count(
        headers in prop::collection::vec("[A-Z ,]{1,12}", 2..8),
    ) {
        let line = headers.iter().map(|h| quote(h)).collect::<Vec<_>>().join("\t");
        prop_assert_eq!(detect_delimiter(&line), Delimiter::Tab);
    }

    /// Tab wins only on a strict majority
    #[test]
    fn tab_requires_strict_majority(commas in 0usize..6, tabs in 0usize..6) {
        let mut line = String::from("A");
        for _ in 0..commas {
            line.push_str(",B");
        }
        for _ in 0..tabs {
            line.push_str("\tC");
        }
        let expected = if tabs > commas { Delimiter::Tab } else { Delimiter::Comma };
        prop_assert_eq!(detect_delimiter(&line), expected);
    }

    // ========== Null normalization ==========

    /// Null markers normalize to null regardless of case and padding
    #[test]
    fn null_markers_normalize_to_none(raw in arb_null_marker()) {
        prop_assert_eq!(normalize_cell(&raw, 500), None);
    }

    /// Normalized cells are trimmed and capped
    #[test]
    fn normalized_cells_respect_cap(raw in "[ a-zA-Z0-9]{0,60}", cap in 1usize..40) {
        if let Some(cell) = normalize_cell(&raw, cap) {
            prop_assert!(cell.chars().count() <= cap);
            prop_assert_eq!(cell.trim(), cell.as_str());
            prop_assert!(!cell.is_empty());
        }
    }
}
