//! Core types and trait definitions for the student information service.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! The store backend and the API layer both depend on it.

// We intentionally use native `async fn` in traits.
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod query;
pub mod store;
pub mod student;

pub use error::{Error, Result};
