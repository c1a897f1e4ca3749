//! [`JsonFileStore`] — the flat-file implementation of [`StudentStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use sims_core::{store::StudentStore, student::StudentRecord};
use tokio::fs;
use uuid::Uuid;

use crate::{Error, Result};

/// A student store backed by a single JSON document.
///
/// Only one process may write the document. Within a process, callers must
/// serialise load-modify-save sequences themselves.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
  path: PathBuf,
}

impl JsonFileStore {
  /// Open the document at `path`, creating it as an empty array (and any
  /// missing parent directories) if it does not exist yet.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let io_err = |source| Error::Io {
      path: path.clone(),
      source,
    };

    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    if !fs::try_exists(&path).await.map_err(io_err)? {
      fs::write(&path, "[]").await.map_err(io_err)?;
      tracing::info!(path = %path.display(), "created empty student document");
    }

    Ok(Self { path })
  }

  /// Location of the backing document.
  pub fn path(&self) -> &Path { &self.path }

  /// A fresh sibling path for one save. Each save gets its own name so two
  /// writes can never interleave in the same temporary file.
  pub(crate) fn temp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_default();
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    self.path.with_file_name(name)
  }

  fn io_error(&self, source: std::io::Error) -> Error {
    Error::Io {
      path: self.path.clone(),
      source,
    }
  }
}

impl StudentStore for JsonFileStore {
  type Error = Error;

  async fn load(&self) -> Result<Vec<StudentRecord>> {
    let text = match fs::read_to_string(&self.path).await {
      Ok(text) => text,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        tracing::warn!(
          path = %self.path.display(),
          "student document missing; treating as empty"
        );
        return Ok(Vec::new());
      }
      Err(e) => return Err(self.io_error(e)),
    };

    if text.trim().is_empty() {
      return Ok(Vec::new());
    }

    serde_json::from_str(&text).map_err(|source| Error::Corrupt {
      path: self.path.clone(),
      source,
    })
  }

  async fn save(&self, records: Vec<StudentRecord>) -> Result<()> {
    let body = serde_json::to_vec_pretty(&records)?;

    // Write beside the target and rename over it so readers never observe a
    // truncated document.
    let temp = self.temp_path();
    let written = match fs::write(&temp, body).await {
      Ok(()) => fs::rename(&temp, &self.path).await,
      Err(e) => Err(e),
    };
    if let Err(e) = written {
      let _ = fs::remove_file(&temp).await;
      return Err(self.io_error(e));
    }

    tracing::debug!(
      path = %self.path.display(),
      count = records.len(),
      "saved student document"
    );
    Ok(())
  }
}
