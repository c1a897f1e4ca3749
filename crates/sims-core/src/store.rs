//! The `StudentStore` trait.
//!
//! A store persists the whole collection as one unit. It has no notion of
//! individual records: callers load everything, change what they need, and
//! save everything back. Serializing those read-modify-write sequences is
//! the caller's job.

use std::future::Future;

use crate::student::StudentRecord;

/// Whole-collection persistence for student records, newest first.
pub trait StudentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the full collection in stored order.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Vec<StudentRecord>, Self::Error>> + Send + '_;

  /// Replace the stored collection with `records`.
  fn save(
    &self,
    records: Vec<StudentRecord>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
