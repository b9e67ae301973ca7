//! Property-based tests for batch execution counts

use std::time::Duration;

use proptest::prelude::*;
use phadir_core::import::{BatchImporter, MappingSession, RawRow, RecordTransformer};
use phadir_core::models::{CanonicalField, FieldMapping};
use phadir_core::progress::{CallbackProgressReporter, ImportProgress};
use phadir_core::store::{MemoryStore, RecordStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Strategy for generating a reasonable batch size
fn arb_batch_size() -> impl Strategy<Value = usize> {
    1usize..40
}

/// Row pattern: `true` means the row has a name
fn arb_rows(max: usize) -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.8), 0..max)
}

fn transformer() -> RecordTransformer {
    let headers = vec!["CODE".to_string(), "NAME".to_string()];
    let mappings = [
        FieldMapping::new("CODE", CanonicalField::Code),
        FieldMapping::new("NAME", CanonicalField::Name),
    ];
    let confirmed = MappingSession::begin(&mappings, &headers).confirm(false).unwrap();
    RecordTransformer::new(&headers, &confirmed)
}

fn build_rows(pattern: &[bool]) -> Vec<RawRow> {
    pattern
        .iter()
        .enumerate()
        .map(|(i, named)| {
            let n = i + 1;
            RawRow::new(
                n,
                vec![Some(format!("C{n}")), named.then(|| format!("Agency {n}"))],
            )
        })
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every row is either processed or counted as an error, unless the run aborts
    #[test]
    fn counts_partition_rows(batch_size in arb_batch_size(), pattern in arb_rows(150)) {
        let rows = build_rows(&pattern);
        let blanks = pattern.iter().filter(|named| !**named).count();
        let store = MemoryStore::new();
        let importer = BatchImporter::new(batch_size).with_batch_pause(Duration::ZERO);

        let result = runtime().block_on(importer.process_rows(&rows, &transformer(), &store, None));
        let report = &result.report;

        if blanks <= importer.max_errors() {
            prop_assert!(result.is_complete());
            prop_assert_eq!(report.processed_count + report.error_count, rows.len());
            prop_assert_eq!(report.error_count, blanks);
            prop_assert_eq!(report.batches_processed, rows.len().div_ceil(batch_size));
        } else {
            prop_assert!(!result.is_complete());
            prop_assert_eq!(report.error_count, importer.max_errors() + 1);
        }
        prop_assert_eq!(runtime().block_on(store.count()).unwrap(), report.processed_count);
    }

    /// Progress counts rise by one per row and never exceed the total
    #[test]
    fn progress_is_monotonic(batch_size in arb_batch_size(), pattern in arb_rows(80)) {
        let rows = build_rows(&pattern);
        let store = MemoryStore::new();
        let last = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&last);
        let total = rows.len();
        let reporter = CallbackProgressReporter::new(move |p: &ImportProgress| {
            let previous = seen.swap(p.current, Ordering::SeqCst);
            assert_eq!(p.current, previous + 1);
            assert!(p.current <= total);
            assert_eq!(p.total, total);
        });
        let importer = BatchImporter::new(batch_size).with_batch_pause(Duration::ZERO);

        let result = runtime().block_on(importer.process_rows(&rows, &transformer(), &store, Some(&reporter)));

        prop_assert_eq!(
            last.load(Ordering::SeqCst),
            result.report.processed_count + result.report.error_count
        );
    }
}
