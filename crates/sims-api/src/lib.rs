//! JSON REST API for the student information service.
//!
//! Exposes an axum [`Router`] backed by any [`StudentStore`]. Static assets,
//! CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let service = Arc::new(StudentService::new(store));
//! Router::new().merge(sims_api::api_router(service))
//! ```

pub mod error;
pub mod service;
pub mod students;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get},
};
use sims_core::store::StudentStore;

pub use error::ApiError;
pub use service::StudentService;

/// Build the API router for `service`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<StudentService<S>>) -> Router<()>
where
  S: StudentStore + 'static,
{
  Router::new()
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route("/students/{id}", delete(students::remove::<S>))
    .with_state(service)
}
