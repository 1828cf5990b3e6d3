//! Storage infrastructure: snapshot and configuration file persistence.
//!
//! This module provides a thin adapter between the persistence trigger and the
//! file system:
//!
//! - [`SnapshotStore`] is the seam the trigger writes through.  It accepts a
//!   fully encoded snapshot and overwrites whatever the location held before.
//! - [`json_file::JsonFileStore`] writes snapshots to a single JSON file and
//!   reads them back on start-up.
//! - [`memory::MemoryStore`] records snapshots in memory, for tests and dry runs.
//! - [`config`] loads the TOML configuration for the demo harness.
//!
//! Keeping storage concerns here means the trigger never touches `tokio::fs`
//! directly, so tests can substitute a store that fails or stalls on demand.

use std::path::PathBuf;

use async_trait::async_trait;
use autosave_core::SnapshotError;
use thiserror::Error;

pub mod config;
pub mod json_file;
pub mod memory;

/// Error type for snapshot storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the snapshot failed (permission denied, missing directory,
    /// disk full, ...).
    #[error("I/O error writing snapshot to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a previously persisted snapshot failed.
    #[error("I/O error reading snapshot from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted snapshot could not be decoded.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The store refused the write (used by [`memory::MemoryStore`] to
    /// simulate an unavailable device).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Destination for encoded settings snapshots.
///
/// Every call to [`SnapshotStore::write`] replaces the full content of the
/// location.  Implementations perform no locking between overlapping writes:
/// when two writes are in flight, whichever finishes last determines the
/// stored content.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Human-readable description of where snapshots go (used in log lines).
    fn location(&self) -> String;

    /// Overwrites the stored snapshot with `contents`.
    async fn write(&self, contents: String) -> Result<(), StorageError>;
}
