//! JSON file snapshot store.
//!
//! Writes each snapshot to a single file, e.g. `settings.json` in the process's
//! working directory.  A write opens the file, truncates it, and writes the new
//! document in full:
//!
//! - No temporary file and no atomic rename: a crash mid-write can leave a
//!   truncated or empty file behind.  [`JsonFileStore::load`] reports such a
//!   file as a decode error rather than guessing.
//! - No lock file and no backup copy are produced.
//! - The parent directory is *not* created.  A missing directory is a write
//!   failure like any other, reported to the trigger.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use autosave_core::{decode_snapshot, SettingsValues};
use tracing::debug;

use super::{SnapshotStore, StorageError};

/// Default snapshot file name, relative to the working directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "settings.json";

/// Snapshot store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing to `path`.  Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back the persisted snapshot.
    ///
    /// Returns `Ok(None)` when the file does not exist yet (first run).
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] for file-system errors other than "not
    /// found", and [`StorageError::Snapshot`] if the content is not a valid
    /// snapshot (including a file truncated by an interrupted write).
    pub async fn load(&self) -> Result<Option<SettingsValues>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let values = decode_snapshot(&content)?;
                debug!(path = %self.path.display(), "loaded settings snapshot");
                Ok(Some(values))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn write(&self, contents: String) -> Result<(), StorageError> {
        tokio::fs::write(&self.path, contents)
            .await
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
