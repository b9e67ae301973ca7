//! Integration tests for the JSON-file record store

use phadir_core::config::ImportSettings;
use phadir_core::import::{FileMeta, ImportController};
use phadir_core::store::{JsonFileStore, RecordStore};
use tempfile::TempDir;

const FILE: &str = "HA_CODE,HA_NAME,HA_EMAIL_ADDR_TEXT\nCA001,Alpha,info@alpha.gov\nCA002,Beta,info@beta.gov\n";

async fn import_into(store: &JsonFileStore) {
    let controller = ImportController::new(ImportSettings::default().with_batch_pause_ms(0));
    let mut job = controller
        .prepare(FileMeta::new("agencies.csv", FILE.len() as u64, None), FILE)
        .unwrap();
    let outcome = controller.run(&mut job, store, true, None).await.unwrap();
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_repeated_imports_across_sessions_upsert() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");

    let store = JsonFileStore::open(&path).await.unwrap();
    import_into(&store).await;
    store.save().await.unwrap();
    let first_ids: Vec<_> = store.list().await.unwrap().iter().map(|r| r.id).collect();

    let reopened = JsonFileStore::open(&path).await.unwrap();
    import_into(&reopened).await;
    reopened.save().await.unwrap();

    let records = reopened.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), first_ids);
    assert_eq!(records[0].record.email.as_deref(), Some("info@alpha.gov"));
}

#[tokio::test]
async fn test_saved_file_uses_camel_case() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("records.json");

    let store = JsonFileStore::open(&path).await.unwrap();
    import_into(&store).await;
    store.save().await.unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &json[0];
    assert_eq!(first["code"], "CA001");
    assert_eq!(first["name"], "Alpha");
    assert!(first.get("updatedAt").is_some());
    assert!(first.get("address").is_none());
}
