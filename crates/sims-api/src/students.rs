//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | Optional `q`, `gender`, `program` filters |
//! | `POST`   | `/students` | Body: [`NewStudent`]; returns 201 + stored record |
//! | `DELETE` | `/students/{id}` | 404 if no record has that `id` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use sims_core::{
  query::StudentQuery,
  store::StudentStore,
  student::{NewStudent, StudentRecord},
};

use crate::{ApiError, StudentService};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /students[?q=...][&gender=...][&program=...]`
pub async fn list<S>(
  State(service): State<Arc<StudentService<S>>>,
  query: Result<Query<StudentQuery>, QueryRejection>,
) -> Result<Json<Vec<StudentRecord>>, ApiError>
where
  S: StudentStore + 'static,
{
  let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  Ok(Json(service.list(&query).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /students` — returns 201 + the stored [`StudentRecord`].
pub async fn create<S>(
  State(service): State<Arc<StudentService<S>>>,
  body: Result<Json<NewStudent>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: StudentStore + 'static,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let record = service.create(input).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /students/{id}`
pub async fn remove<S>(
  State(service): State<Arc<StudentService<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  S: StudentStore + 'static,
{
  service.delete(&id).await?;
  Ok(Json(json!({ "message": "Student deleted" })))
}
