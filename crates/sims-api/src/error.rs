//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by the student service or one of its handlers.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] sims_core::Error),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("student not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(_) => {
        (StatusCode::BAD_REQUEST, "Missing required fields".to_owned())
      }
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::NotFound(_) => {
        (StatusCode::NOT_FOUND, "Student not found".to_owned())
      }
      ApiError::Store(e) => {
        // Storage details stay in the log, never in the response body.
        tracing::error!(error = %e, "student store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
