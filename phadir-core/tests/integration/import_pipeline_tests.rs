//! End-to-end tests for the import pipeline

use std::fmt::Write as _;
use std::sync::Mutex;

use phadir_core::config::ImportSettings;
use phadir_core::error::{FileValidationError, ImportError};
use phadir_core::import::{FileMeta, ImportController, JobStatus, MappingSession};
use phadir_core::models::CanonicalField;
use phadir_core::progress::{CallbackProgressReporter, ImportProgress};
use phadir_core::store::{MemoryStore, RecordStore};

fn controller() -> ImportController {
    ImportController::new(ImportSettings::default().with_batch_pause_ms(0))
}

fn meta(name: &str, text: &str) -> FileMeta {
    FileMeta::new(name, text.len() as u64, None)
}

// ============================================================================
// End-to-end
// ============================================================================

#[tokio::test]
async fn test_participant_file_imports_two_records() {
    let text = "PARTICIPANT_CODE,FORMAL_PARTICIPANT_NAME,FULL_ADDRESS\n\
                CA001,\"Alpha <Housing> Authority\",\"100 Main St, Fresno\"\n\
                CA002,Beta Housing,null\n";
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("agencies.csv", text), text).unwrap();

    let suggested = job.mapping_session().unwrap().confirmed_mappings();
    let targets: Vec<_> = suggested.iter().map(|m| m.target_field).collect();
    assert_eq!(
        targets,
        vec![
            Some(CanonicalField::Code),
            Some(CanonicalField::Name),
            Some(CanonicalField::Address)
        ]
    );

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();

    assert!(outcome.result.success);
    assert_eq!(outcome.result.processed_count, Some(2));
    assert_eq!(outcome.result.error_count, Some(0));
    assert_eq!(job.status(), JobStatus::Completed);

    let records = store.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].record.name(), "Alpha Housing Authority");
    assert_eq!(records[0].record.code.as_deref(), Some("CA001"));
    assert_eq!(records[0].record.address.as_deref(), Some("100 Main St, Fresno"));
    assert_eq!(records[1].record.name(), "Beta Housing");
    assert_eq!(records[1].record.address, None);
}

#[tokio::test]
async fn test_tab_delimited_file_with_short_rows() {
    let text = "PHA_CODE\tPHA_NAME\tPHONE\tEMAIL\nCA001\tAlpha\nCA002\tBeta\t555-0100\tnot-an-email\n";
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("agencies.txt", text), text).unwrap();

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();

    assert_eq!(outcome.report.processed_count, 2);
    assert_eq!(
        outcome.report.warnings,
        vec!["Record 2: invalid email format in email".to_string()]
    );
    let beta = store.find_by_code("CA002").await.unwrap();
    assert_eq!(beta.record.phone.as_deref(), Some("555-0100"));
    assert_eq!(beta.record.email.as_deref(), Some("not-an-email"));
    let alpha = store.find_by_code("CA001").await.unwrap();
    assert_eq!(alpha.record.phone, None);
}

#[tokio::test]
async fn test_secondary_address_and_phone_columns_keep_primary_values() {
    let text = "CODE,NAME,ADDRESS,ADDRESS_LINE_2,PHONE,PHONE_EXT\n\
                CA1,Alpha,100 Main St,,555-0100,12\n";
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("agencies.csv", text), text).unwrap();

    let session = job.mapping_session().unwrap();
    let secondary: Vec<_> = session
        .mappings()
        .iter()
        .filter(|m| m.source_column == "ADDRESS_LINE_2" || m.source_column == "PHONE_EXT")
        .collect();
    assert_eq!(secondary.len(), 2);
    assert!(secondary.iter().all(|m| m.target_field.is_none() && !m.enabled));

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();
    assert!(outcome.result.success);

    let alpha = store.find_by_code("CA1").await.unwrap();
    assert_eq!(alpha.record.address.as_deref(), Some("100 Main St"));
    assert_eq!(alpha.record.phone.as_deref(), Some("555-0100"));
}

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_reimport_with_codes_is_idempotent() {
    let text = "CODE,NAME\nCA001,Alpha\nCA002,Beta\nCA003,Gamma\n";
    let controller = controller();
    let store = MemoryStore::new();

    let mut first = controller.prepare(meta("a.csv", text), text).unwrap();
    controller.run(&mut first, &store, true, None).await.unwrap();
    let count = store.count().await.unwrap();

    let mut second = controller.prepare(meta("a.csv", text), text).unwrap();
    let outcome = controller.run(&mut second, &store, true, None).await.unwrap();

    assert_eq!(outcome.result.error_count, Some(0));
    assert_eq!(outcome.report.updated, 3);
    assert_eq!(outcome.report.inserted, 0);
    assert_eq!(store.count().await.unwrap(), count);
}

#[tokio::test]
async fn test_reimport_without_codes_accumulates() {
    let text = "NAME\nAlpha\nBeta\n";
    let controller = controller();
    let store = MemoryStore::new();

    for _ in 0..2 {
        let mut job = controller.prepare(meta("a.csv", text), text).unwrap();
        controller.run(&mut job, &store, true, None).await.unwrap();
    }

    assert_eq!(store.count().await.unwrap(), 4);
}

// ============================================================================
// Threshold abort
// ============================================================================

#[tokio::test]
async fn test_blank_names_abort_after_threshold() {
    let mut text = String::from("CODE,NAME\n");
    for n in 1..=60 {
        writeln!(text, "C{n:03},").unwrap();
    }
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("blank.csv", &text), &text).unwrap();

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();

    assert!(!outcome.result.success);
    assert_eq!(outcome.result.error_count, Some(51));
    assert_eq!(outcome.result.processed_count, Some(0));
    assert!(matches!(outcome.error, Some(ImportError::TooManyErrors { .. })));
    assert_eq!(outcome.report.errors.len(), 51);
    assert_eq!(
        outcome.report.errors.last().map(String::as_str),
        Some("Record 51: missing required field 'name'")
    );
    assert_eq!(job.status(), JobStatus::Failed);
    assert_eq!(job.result(), Some(&outcome.result));
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_partial_counts_survive_abort() {
    let mut text = String::from("CODE,NAME\n");
    for n in 1..=10 {
        writeln!(text, "C{n:03},Agency {n}").unwrap();
    }
    for n in 11..=80 {
        writeln!(text, "C{n:03},").unwrap();
    }
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("mixed.csv", &text), &text).unwrap();

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();

    assert_eq!(outcome.result.processed_count, Some(10));
    assert_eq!(outcome.result.error_count, Some(51));
    assert_eq!(store.count().await.unwrap(), 10);
}

// ============================================================================
// Row-count ceiling and intake
// ============================================================================

#[test]
fn test_row_ceiling_fails_before_mapping() {
    let mut text = String::with_capacity(1_500_000);
    text.push_str("CODE,NAME\n");
    for n in 0..100_001 {
        writeln!(text, "C{n},A").unwrap();
    }
    let err = controller()
        .prepare(meta("huge.csv", &text), &text)
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::FileValidation(FileValidationError::TooManyRecords {
            count: 100_001,
            limit: 100_000
        })
    ));
    assert!(err.is_fail_fast());
}

#[test]
fn test_exactly_max_rows_is_accepted() {
    let settings = ImportSettings::default().with_max_rows(5);
    let controller = ImportController::new(settings);
    let text = "NAME\na\nb\nc\nd\ne\n";
    let job = controller.prepare(meta("ok.csv", text), text).unwrap();
    assert_eq!(job.parsed().unwrap().row_count(), 5);
}

#[test]
fn test_unsupported_type_is_rejected() {
    let text = "NAME\nAlpha\n";
    let err = controller()
        .prepare(meta("agencies.xlsx", text), text)
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::FileValidation(FileValidationError::UnsupportedType(_))
    ));

    let declared = FileMeta::new("export", text.len() as u64, Some("text/csv".into()));
    assert!(controller().prepare(declared, text).is_ok());
}

#[tokio::test]
async fn test_prepare_path_reads_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("agencies.csv");
    std::fs::write(&path, "PHA_CODE,PHA_NAME\nCA001,Alpha\n").unwrap();

    let job = controller().prepare_path(&path).await.unwrap();
    assert_eq!(job.file_meta().name, "agencies.csv");
    assert_eq!(job.parsed().unwrap().row_count(), 1);

    let missing = controller()
        .prepare_path(&dir.path().join("missing.csv"))
        .await
        .unwrap_err();
    assert!(matches!(missing, ImportError::Read { .. }));
}

// ============================================================================
// Mapping gate
// ============================================================================

#[tokio::test]
async fn test_run_without_name_mapping_fails_fast() {
    let text = "CODE,LABEL\nCA001,Alpha\n";
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("a.csv", text), text).unwrap();

    let status =
        MappingSession::required_field_status(&job.mapping_session().unwrap().confirmed_mappings());
    assert!(!status.satisfied);
    assert_eq!(status.missing_required, vec![CanonicalField::Name]);

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();
    assert!(matches!(
        outcome.error,
        Some(ImportError::MappingIncomplete { .. })
    ));
    assert_eq!(outcome.result.processed_count, None);
    assert_eq!(job.status(), JobStatus::Failed);
}

#[tokio::test]
async fn test_manual_mapping_enables_unknown_header() {
    let text = "CODE,LABEL\nCA001,Alpha\n";
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("a.csv", text), text).unwrap();

    job.mapping_session_mut()
        .unwrap()
        .set_target("LABEL", Some(CanonicalField::Name));
    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(store.find_by_code("CA001").await.unwrap().record.name(), "Alpha");
}

#[tokio::test]
async fn test_strict_mapping_rejects_duplicate_targets() {
    let text = "NAME,PHA_NAME\nAlpha,Alpha Housing\n";
    let store = MemoryStore::new();

    let lenient = controller();
    let mut job = lenient.prepare(meta("a.csv", text), text).unwrap();
    lenient.run(&mut job, &store, true, None).await.unwrap();
    assert_eq!(store.list().await.unwrap()[0].record.name(), "Alpha Housing");

    let strict = ImportController::new(
        ImportSettings::default()
            .with_batch_pause_ms(0)
            .with_reject_duplicate_targets(true),
    );
    let mut job = strict.prepare(meta("a.csv", text), text).unwrap();
    let outcome = strict.run(&mut job, &store, true, None).await.unwrap();
    assert!(matches!(
        outcome.error,
        Some(ImportError::DuplicateTargetMapping {
            field: CanonicalField::Name,
            ..
        })
    ));
}

// ============================================================================
// Authentication and progress
// ============================================================================

#[tokio::test]
async fn test_store_denial_fails_job_with_authentication_error() {
    let text = "CODE,NAME\nCA001,Alpha\nCA002,Beta\n";
    let controller = controller();
    let store = MemoryStore::new();
    store.set_deny_writes(true);
    let mut job = controller.prepare(meta("a.csv", text), text).unwrap();

    let outcome = controller.run(&mut job, &store, true, None).await.unwrap();

    assert!(matches!(outcome.error, Some(ImportError::AuthenticationRequired)));
    assert_eq!(outcome.result.error.as_deref(), Some("authentication required"));
    assert_eq!(outcome.result.error_count, Some(1));
}

#[tokio::test]
async fn test_progress_events_follow_file_order() {
    let text = "CODE,NAME\nCA001,Alpha\nCA002,\nCA003,Gamma\n";
    let controller = controller();
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("a.csv", text), text).unwrap();

    let events = Mutex::new(Vec::new());
    let reporter = CallbackProgressReporter::new(|p: &ImportProgress| {
        events.lock().unwrap().push(p.clone());
    });
    controller
        .run(&mut job, &store, true, Some(&reporter))
        .await
        .unwrap();
    drop(reporter);

    let labels: Vec<_> = events
        .into_inner()
        .unwrap()
        .into_iter()
        .map(|p| (p.current, p.total, p.current_record_label))
        .collect();
    assert_eq!(
        labels,
        vec![
            (1, 3, Some("Alpha".to_string())),
            (2, 3, Some("Record 2".to_string())),
            (3, 3, Some("Gamma".to_string())),
        ]
    );
}

#[tokio::test]
async fn test_cancel_from_reporter_stops_between_batches() {
    let mut text = String::from("CODE,NAME\n");
    for n in 1..=100 {
        writeln!(text, "C{n:03},Agency {n}").unwrap();
    }
    let controller = ImportController::new(
        ImportSettings::default()
            .with_batch_pause_ms(0)
            .with_batch_size(10),
    );
    let store = MemoryStore::new();
    let mut job = controller.prepare(meta("a.csv", &text), &text).unwrap();

    let token = job.cancel_token();
    let reporter = CallbackProgressReporter::new(move |p: &ImportProgress| {
        if p.current == 15 {
            token.cancel();
        }
    });

    let outcome = controller
        .run(&mut job, &store, true, Some(&reporter))
        .await
        .unwrap();

    assert!(matches!(outcome.error, Some(ImportError::Cancelled)));
    assert_eq!(outcome.result.processed_count, Some(20));
    assert_eq!(store.count().await.unwrap(), 20);
}
