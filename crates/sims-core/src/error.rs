//! Error types for `sims-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more required create fields were absent or blank. Holds the
  /// wire names of the offending fields.
  #[error("missing required fields: {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
