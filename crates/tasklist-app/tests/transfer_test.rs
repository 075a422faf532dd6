//! Integration tests for export/import through the task service.
//!
//! Exports go to a temporary directory and are read back through the same
//! path the shell uses.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use tasklist_app::sample::sample_tasks;
use tasklist_app::transfer::export_file_name;
use tasklist_app::{TaskService, TransferError};
use tasklist_core::{ImportFormatError, TaskFields, TaskId, TaskStore};
use tempfile::TempDir;
use time::OffsetDateTime;
use time::macros::datetime;

fn fixed_now() -> OffsetDateTime {
    datetime!(2025-08-12 08:00 UTC)
}

fn sample_service() -> TaskService {
    let store = TaskStore::from_tasks(sample_tasks())
        .expect("sample data loads")
        .with_clock(fixed_now);
    TaskService::new(store)
}

#[tokio::test]
async fn export_then_import_reassigns_fresh_ids() {
    let temp = TempDir::with_prefix("tasklist-transfer-").expect("create temp dir");
    let mut service = sample_service();

    let path = service.export_to(temp.path()).await.expect("export succeeds");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some(export_file_name(fixed_now().date()).as_str())
    );
    let text = fs::read_to_string(&path).expect("read export");
    assert!(text.contains("\"exportDate\""));
    assert!(text.contains("\"version\": \"1.0\""));

    let pending = TaskService::load_import(&path).await.expect("import parses");
    assert_eq!(pending.len(), 3);

    let ids = service.apply_import(pending).expect("import applies");
    assert_eq!(ids, vec![TaskId(4), TaskId(5), TaskId(6)]);

    let store = service.store();
    let titles: Vec<_> = store.tasks().iter().map(|task| task.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Complete project documentation",
            "Prepare for technical interview",
            "Submit assignment",
        ]
    );
    assert_eq!(store.statistics().completed, 1);
    assert_eq!(store.get(TaskId(6)).map(|task| task.created_at), Some(datetime!(2025-08-08 09:15 UTC)));
    assert!(store.get(TaskId(1)).is_none());
}

#[tokio::test]
async fn import_clears_the_selection() {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("in.json");
    fs::write(&path, r#"{"todos":[{"title":"Only one"}]}"#).expect("write import");

    let mut service = sample_service();
    service.select(&[TaskId(1), TaskId(2)]).expect("select");
    let pending = TaskService::load_import(&path).await.expect("import parses");
    service.apply_import(pending).expect("import applies");

    assert!(service.store().selection().is_empty());
    assert_eq!(service.store().len(), 1);
}

#[tokio::test]
async fn malformed_import_leaves_store_untouched() {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("broken.json");
    fs::write(&path, r#"{"items": []}"#).expect("write import");

    let mut service = sample_service();
    service.add(TaskFields::new("Local work")).expect("add");

    let err = TaskService::load_import(&path).await.unwrap_err();
    assert!(matches!(err, TransferError::Format(ImportFormatError::MissingTodos)));
    assert_eq!(service.store().len(), 4);
}

#[tokio::test]
async fn missing_import_file_is_a_read_error() {
    let temp = TempDir::new().expect("create temp dir");
    let err = TaskService::load_import(temp.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, TransferError::Read { .. }));
}

#[tokio::test]
async fn blank_imported_title_is_rejected() {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("blank.json");
    fs::write(&path, r#"{"todos":[{"title":"ok"},{"title":"   "}]}"#).expect("write import");

    let service = sample_service();
    let err = TaskService::load_import(&path).await.unwrap_err();
    assert!(matches!(
        err,
        TransferError::Format(ImportFormatError::MissingTitle { index: 1 })
    ));
    assert_eq!(service.store().len(), 3);
}
