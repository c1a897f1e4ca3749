//! Tests for `JsonFileStore` against documents in a scratch directory.

use std::path::PathBuf;

use chrono::Utc;
use sims_core::{
  store::StudentStore,
  student::{NewStudent, StudentRecord},
};
use uuid::Uuid;

use crate::{Error, JsonFileStore};

/// A scratch directory holding one document, removed on drop.
struct Scratch {
  root: PathBuf,
}

impl Scratch {
  fn new() -> Self {
    Self {
      root: std::env::temp_dir().join(format!("sims-store-{}", Uuid::new_v4())),
    }
  }

  fn doc(&self) -> PathBuf { self.root.join("students.json") }

  async fn temp_files(&self) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut entries = tokio::fs::read_dir(&self.root).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
      if entry.file_name().to_string_lossy().ends_with(".tmp") {
        found.push(entry.path());
      }
    }
    found
  }
}

impl Drop for Scratch {
  fn drop(&mut self) { let _ = std::fs::remove_dir_all(&self.root); }
}

fn student(id: &str, name: &str) -> StudentRecord {
  NewStudent {
    student_id: Some(format!("S-{id}")),
    full_name: Some(name.into()),
    gmail: Some("someone@example.com".into()),
    program: Some("CS".into()),
    year_level: Some(1),
    ..Default::default()
  }
  .validate()
  .unwrap()
  .into_record(id.into(), Utc::now())
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_creates_empty_document() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();

  let text = tokio::fs::read_to_string(&path).await.unwrap();
  assert_eq!(text, "[]");
  assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn open_leaves_existing_document_alone() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  store.save(vec![student("1", "Ann Lee")]).await.unwrap();

  let reopened = JsonFileStore::open(&path).await.unwrap();
  assert_eq!(reopened.load().await.unwrap().len(), 1);
}

// ─── Load / save ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_then_load_preserves_order_and_fields() {
  let scratch = Scratch::new();
  let store = JsonFileStore::open(scratch.doc()).await.unwrap();
  let records = vec![student("2", "Bo Chan"), student("1", "Ann Lee")];
  store.save(records.clone()).await.unwrap();

  assert_eq!(store.load().await.unwrap(), records);
}

#[tokio::test]
async fn save_replaces_previous_content() {
  let scratch = Scratch::new();
  let store = JsonFileStore::open(scratch.doc()).await.unwrap();
  store
    .save(vec![student("2", "Bo Chan"), student("1", "Ann Lee")])
    .await
    .unwrap();
  store.save(vec![student("3", "Carl Moss")]).await.unwrap();

  let loaded = store.load().await.unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].id, "3");
}

#[tokio::test]
async fn save_writes_pretty_json_and_leaves_no_temp_file() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  store.save(vec![student("1", "Ann Lee")]).await.unwrap();

  let text = tokio::fs::read_to_string(&path).await.unwrap();
  assert!(text.contains("\n  {"), "not pretty-printed: {text}");
  assert!(text.contains("\"fullName\": \"Ann Lee\""));

  assert!(scratch.temp_files().await.is_empty());
}

#[tokio::test]
async fn zero_length_document_is_empty() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  tokio::fs::write(&path, "").await.unwrap();

  assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_document_after_open_is_empty() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  tokio::fs::remove_file(&path).await.unwrap();

  assert!(store.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_document_is_an_error() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  tokio::fs::write(&path, "{ not json").await.unwrap();

  let err = store.load().await.unwrap_err();
  assert!(matches!(err, Error::Corrupt { .. }), "got {err:?}");

  // The corrupt content must still be there for an operator to inspect.
  let text = tokio::fs::read_to_string(&path).await.unwrap();
  assert_eq!(text, "{ not json");
}

#[tokio::test]
async fn legacy_document_written_by_hand_loads() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  tokio::fs::write(
    &path,
    r#"[
  {
    "id": "1714552200000",
    "createdAt": "2024-05-01T08:30:00.000Z",
    "studentId": "S1",
    "fullName": "Ann Lee",
    "gender": "F",
    "gmail": "a@x.com",
    "program": "CS",
    "yearLevel": 2,
    "university": ""
  }
]"#,
  )
  .await
  .unwrap();

  let loaded = store.load().await.unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0].year_level, Some(2));
  assert_eq!(loaded[0].university, None);
}

#[tokio::test]
async fn legacy_document_with_numeric_text_fields_loads() {
  let scratch = Scratch::new();
  let path = scratch.doc();
  let store = JsonFileStore::open(&path).await.unwrap();
  tokio::fs::write(
    &path,
    r#"[
  {
    "id": "1714552300000",
    "createdAt": "2024-05-01T08:31:40.000Z",
    "studentId": 2021001,
    "fullName": "Bo Chan",
    "gmail": "bo@x.com",
    "yearLevel": "3"
  },
  {
    "id": "1714552200000",
    "createdAt": "2024-05-01T08:30:00.000Z",
    "studentId": "S1",
    "fullName": "Ann Lee",
    "gmail": "a@x.com"
  }
]"#,
  )
  .await
  .unwrap();

  let loaded = store.load().await.unwrap();
  assert_eq!(loaded.len(), 2);
  assert_eq!(loaded[0].student_id, "2021001");
  assert_eq!(loaded[0].year_level, Some(3));
  assert_eq!(loaded[1].student_id, "S1");
}

// ─── Overlapping saves ───────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_saves_never_publish_mixed_content() {
  let scratch = Scratch::new();
  let store = JsonFileStore::open(scratch.doc()).await.unwrap();

  let tasks: Vec<_> = (0..16)
    .map(|n| {
      let store = store.clone();
      let records: Vec<_> = (0..=n)
        .map(|i| student(&format!("{n}-{i}"), "Someone With A Longer Name"))
        .collect();
      tokio::spawn(async move { store.save(records).await.unwrap() })
    })
    .collect();
  for task in tasks {
    task.await.unwrap();
  }

  // Whichever save landed last, the document is one complete collection.
  let loaded = store.load().await.unwrap();
  let prefix = loaded[0].id.split('-').next().unwrap().to_owned();
  assert!(loaded.iter().all(|r| r.id.starts_with(&format!("{prefix}-"))));
  assert_eq!(loaded.len(), prefix.parse::<usize>().unwrap() + 1);
  assert!(scratch.temp_files().await.is_empty());
}

#[tokio::test]
async fn each_save_uses_its_own_temp_file() {
  let scratch = Scratch::new();
  let store = JsonFileStore::open(scratch.doc()).await.unwrap();
  assert_ne!(store.temp_path(), store.temp_path());
  assert_eq!(store.temp_path().parent(), scratch.doc().parent());
}
