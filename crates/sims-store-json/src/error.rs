//! Error type for `sims-store-json`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("i/o error on {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The backing document exists but is not a valid student array.
  #[error("backing document {path:?} is corrupt: {source}")]
  Corrupt {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("failed to serialise students: {0}")]
  Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
