//! [`StudentService`] — list, create and delete over a whole-collection store.
//!
//! Every mutation is a load → modify → save over the entire collection. The
//! service holds a write gate across that sequence so concurrent creates and
//! deletes in one process cannot overwrite each other's changes. The sequence
//! runs on its own task, so it finishes even when the request is dropped.
//! Reads skip the gate.

use std::sync::Arc;

use chrono::Utc;
use sims_core::{
  query::StudentQuery,
  store::StudentStore,
  student::{NewStudent, StudentRecord, next_id},
};
use tokio::sync::Mutex;

use crate::ApiError;

pub struct StudentService<S> {
  store:      Arc<S>,
  write_gate: Arc<Mutex<()>>,
}

impl<S: StudentStore + 'static> StudentService<S> {
  pub fn new(store: S) -> Self {
    Self {
      store:      Arc::new(store),
      write_gate: Arc::new(Mutex::new(())),
    }
  }

  pub fn store(&self) -> &S { &self.store }

  /// All records passing `query`, newest first.
  pub async fn list(
    &self,
    query: &StudentQuery,
  ) -> Result<Vec<StudentRecord>, ApiError> {
    let records = self.store.load().await.map_err(ApiError::store)?;
    Ok(query.apply(records))
  }

  /// Validate `input`, assign `id` and `createdAt`, and prepend the new
  /// record. Nothing is read or written if validation fails.
  pub async fn create(
    &self,
    input: NewStudent,
  ) -> Result<StudentRecord, ApiError> {
    let valid = input.validate()?;

    let record = self
      .mutate(move |records| {
        let created_at = Utc::now();
        let id = next_id(created_at, records.as_slice());
        let record = valid.into_record(id, created_at);
        records.insert(0, record.clone());
        Ok(record)
      })
      .await?;

    tracing::info!(id = %record.id, student_id = %record.student_id, "created student");
    Ok(record)
  }

  /// Remove the record with `id`, returning it.
  ///
  /// The collection is not rewritten when no record matches.
  pub async fn delete(&self, id: &str) -> Result<StudentRecord, ApiError> {
    let id = id.to_owned();
    let removed = self
      .mutate(move |records| {
        let index = records
          .iter()
          .position(|r| r.id == id)
          .ok_or(ApiError::NotFound(id))?;
        Ok(records.remove(index))
      })
      .await?;

    tracing::info!(id = %removed.id, "deleted student");
    Ok(removed)
  }

  /// Run load → `change` → save on its own task while holding the write
  /// gate. The task runs to completion even if the caller is dropped, so a
  /// disconnected client never leaves a save half done. If `change` fails
  /// the collection is not saved.
  async fn mutate<T, F>(&self, change: F) -> Result<T, ApiError>
  where
    T: Send + 'static,
    F: FnOnce(&mut Vec<StudentRecord>) -> Result<T, ApiError> + Send + 'static,
  {
    let store = Arc::clone(&self.store);
    let gate = Arc::clone(&self.write_gate);

    tokio::spawn(async move {
      let _gate = gate.lock_owned().await;
      let mut records = store.load().await.map_err(ApiError::store)?;
      let out = change(&mut records)?;
      store.save(records).await.map_err(ApiError::store)?;
      Ok::<_, ApiError>(out)
    })
    .await
    .map_err(ApiError::store)?
  }
}
