//! Flat-file JSON backend for the student store.
//!
//! The whole collection lives in one JSON array on disk. Every load reads the
//! full document and every save rewrites it.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonFileStore;

#[cfg(test)]
mod tests;
