//! Restore: chooses the values a fresh settings object starts from.
//!
//! On start-up the last persisted snapshot, if any, seeds the container.  A
//! snapshot that cannot be used never stops the process:
//!
//! | Situation                         | Starting values        |
//! |-----------------------------------|------------------------|
//! | restore disabled                  | defaults (file unread) |
//! | file missing (first run)          | defaults               |
//! | file unreadable or not a snapshot | defaults, `warn!` log  |
//! | valid snapshot                    | the stored values      |
//!
//! A file truncated by an interrupted write lands in the third row.  The next
//! committed change overwrites it with a complete snapshot.

use autosave_core::SettingsValues;
use tracing::{debug, info, warn};

use crate::infrastructure::storage::json_file::JsonFileStore;

/// Returns the values the settings object should be created with.
pub async fn initial_values(store: &JsonFileStore, enabled: bool) -> SettingsValues {
    if !enabled {
        debug!(path = %store.path().display(), "restore disabled; starting from defaults");
        return SettingsValues::default();
    }

    match store.load().await {
        Ok(Some(values)) => {
            info!(path = %store.path().display(), "restored settings from snapshot");
            values
        }
        Ok(None) => {
            debug!(path = %store.path().display(), "no snapshot yet; starting from defaults");
            SettingsValues::default()
        }
        Err(e) => {
            warn!("ignoring unreadable snapshot: {e}");
            SettingsValues::default()
        }
    }
}
