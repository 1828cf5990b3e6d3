//! PersistOnChange: saves the whole settings object after every change.
//!
//! [`PersistenceTrigger`] subscribes to a [`Settings`] container.  Each time
//! the container reports a committed change, the trigger:
//!
//! 1. Encodes the complete state it was handed (every field, not only the one
//!    that changed) into the JSON snapshot format.  This happens synchronously
//!    inside the notification, so the snapshot is exactly the state at the
//!    moment the write was dispatched.
//! 2. Dispatches the write to the [`SnapshotStore`] as a detached Tokio task
//!    and returns.  The setter that caused the change never waits for the disk.
//! 3. When the write finishes, logs the outcome and (optionally) publishes a
//!    [`SaveReport`] on the report channel.
//!
//! Failures in step 1 or 3 are logged and dropped.  They never reach the code
//! that changed the field, and the in-memory state stays correct; durability
//! for that change is simply lost until the next successful save.
//!
//! # Write ordering
//!
//! Two policies are available, chosen with [`WriteOrdering`]:
//!
//! ```text
//! Racy    change#0 ──spawn──► write#0 ───────────────┐ (slow)
//!         change#1 ──spawn──► write#1 ──┐            │
//!                                       ▼            ▼
//!                              file = snapshot#1   file = snapshot#0   ← stale
//!
//! Queued  change#0 ──┐
//!         change#1 ──┴─► channel ──► single writer: write#0, then write#1
//!                                                   file = snapshot#1
//! ```
//!
//! `Racy` is the default: each write is independent and the last write to
//! *complete* wins, so the file can briefly (or, if no further change happens,
//! finally) hold an older snapshot than memory.  `Queued` serializes writes
//! through one background task so the file always converges to the latest
//! change.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use autosave_core::{encode_snapshot, ChangeNotification, Settings, SettingsValues, SubscriptionId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::infrastructure::storage::SnapshotStore;

/// Error type for the persist-on-change use case.
#[derive(Debug, Error)]
pub enum PersistError {
    /// `attach` was called outside a Tokio runtime, so there is nowhere to
    /// spawn background writes.
    #[error("persistence trigger must be attached from within a Tokio runtime")]
    NoRuntime,
}

/// Returned when a write-ordering name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown write ordering {0:?} (expected \"racy\" or \"queued\")")]
pub struct UnknownOrdering(pub String);

/// How overlapping background writes are coordinated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOrdering {
    /// One independent task per change; last write to complete wins.
    #[default]
    Racy,
    /// Writes are queued and performed one at a time in change order.
    Queued,
}

impl fmt::Display for WriteOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteOrdering::Racy => "racy",
            WriteOrdering::Queued => "queued",
        })
    }
}

impl FromStr for WriteOrdering {
    type Err = UnknownOrdering;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "racy" => Ok(WriteOrdering::Racy),
            "queued" => Ok(WriteOrdering::Queued),
            _ => Err(UnknownOrdering(s.to_string())),
        }
    }
}

/// Outcome of one save, published after the write attempt finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// The change that triggered this save.
    pub notification: ChangeNotification,
    /// The state that was (or should have been) written.
    pub state: SettingsValues,
    /// Where the snapshot was written.
    pub location: String,
    /// `Err` holds the rendered error message.
    pub result: Result<(), String>,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A snapshot captured at notification time, waiting to be written.
#[derive(Debug)]
struct PendingWrite {
    notification: ChangeNotification,
    state: SettingsValues,
    contents: String,
}

/// Persists the full settings state on every change notification.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use autosave_core::Settings;
/// use autosave_store::application::persist_on_change::{PersistenceTrigger, WriteOrdering};
/// use autosave_store::infrastructure::storage::json_file::JsonFileStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let mut settings = Settings::new();
/// PersistenceTrigger::new(Arc::new(JsonFileStore::new("settings.json")), WriteOrdering::Racy)
///     .attach(&mut settings)?;
///
/// settings.set_field_two(true); // settings.json is rewritten in the background
/// # Ok(())
/// # }
/// ```
pub struct PersistenceTrigger {
    store: Arc<dyn SnapshotStore>,
    ordering: WriteOrdering,
    reports: Option<mpsc::UnboundedSender<SaveReport>>,
}

impl PersistenceTrigger {
    pub fn new(store: Arc<dyn SnapshotStore>, ordering: WriteOrdering) -> Self {
        Self {
            store,
            ordering,
            reports: None,
        }
    }

    /// Enables save reports and returns the receiving end.
    ///
    /// One [`SaveReport`] is sent per write attempt, in completion order.
    pub fn with_reports(mut self) -> (Self, mpsc::UnboundedReceiver<SaveReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.reports = Some(tx);
        (self, rx)
    }

    /// The write ordering this trigger dispatches with.
    pub fn ordering(&self) -> WriteOrdering {
        self.ordering
    }

    /// Subscribes the trigger to `settings`.
    ///
    /// Must be called from within a Tokio runtime; the runtime's handle is
    /// captured so notifications delivered from any thread can spawn writes.
    /// Pass the returned id to [`Settings::unsubscribe`] to detach.  With
    /// [`WriteOrdering::Queued`], the writer task finishes the queued writes
    /// and exits once the trigger is detached or the settings are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::NoRuntime`] outside a Tokio runtime.
    pub fn attach(self, settings: &mut Settings) -> Result<SubscriptionId, PersistError> {
        let runtime = Handle::try_current().map_err(|_| PersistError::NoRuntime)?;

        let dispatch = match self.ordering {
            WriteOrdering::Racy => Dispatch::Spawn(runtime),
            WriteOrdering::Queued => {
                let (tx, rx) = mpsc::unbounded_channel();
                runtime.spawn(writer_loop(
                    Arc::clone(&self.store),
                    rx,
                    self.reports.clone(),
                ));
                Dispatch::Queue(tx)
            }
        };

        let handler = TriggerHandler {
            store: self.store,
            reports: self.reports,
            dispatch,
        };
        let id = settings.subscribe(move |state, notification| {
            handler.on_notified(state, notification);
        });
        info!(ordering = %self.ordering, subscription = %id, "persistence trigger attached");
        Ok(id)
    }
}

/// Where a captured snapshot goes once encoded.
enum Dispatch {
    /// Spawn one independent task per write.
    Spawn(Handle),
    /// Hand the write to the single writer task.
    Queue(mpsc::UnboundedSender<PendingWrite>),
}

/// The subscribed half of the trigger, owned by the settings container.
struct TriggerHandler {
    store: Arc<dyn SnapshotStore>,
    reports: Option<mpsc::UnboundedSender<SaveReport>>,
    dispatch: Dispatch,
}

impl TriggerHandler {
    /// Called synchronously for each change; returns without waiting for I/O.
    fn on_notified(&self, state: &SettingsValues, notification: &ChangeNotification) {
        let contents = match encode_snapshot(state) {
            Ok(contents) => contents,
            Err(e) => {
                let location = self.store.location();
                error!(field = %notification.field, "failed to save settings to {location}: {e}");
                send_report(
                    self.reports.as_ref(),
                    SaveReport {
                        notification: *notification,
                        state: *state,
                        location,
                        result: Err(e.to_string()),
                    },
                );
                return;
            }
        };

        let pending = PendingWrite {
            notification: *notification,
            state: *state,
            contents,
        };
        debug!(
            field = %notification.field,
            sequence = notification.sequence,
            "dispatching settings snapshot write"
        );

        match &self.dispatch {
            Dispatch::Spawn(runtime) => {
                let store = Arc::clone(&self.store);
                let reports = self.reports.clone();
                runtime.spawn(async move {
                    write_snapshot(store.as_ref(), pending, reports.as_ref()).await;
                });
            }
            Dispatch::Queue(queue) => {
                if let Err(mpsc::error::SendError(lost)) = queue.send(pending) {
                    warn!(
                        sequence = lost.notification.sequence,
                        "settings writer has stopped; snapshot dropped"
                    );
                }
            }
        }
    }
}

/// Drains the write queue one snapshot at a time, in change order.
async fn writer_loop(
    store: Arc<dyn SnapshotStore>,
    mut queue: mpsc::UnboundedReceiver<PendingWrite>,
    reports: Option<mpsc::UnboundedSender<SaveReport>>,
) {
    while let Some(pending) = queue.recv().await {
        write_snapshot(store.as_ref(), pending, reports.as_ref()).await;
    }
    debug!("settings writer stopped");
}

/// Performs one write, logs the outcome, and publishes a report.
async fn write_snapshot(
    store: &dyn SnapshotStore,
    pending: PendingWrite,
    reports: Option<&mpsc::UnboundedSender<SaveReport>>,
) {
    let PendingWrite {
        notification,
        state,
        contents,
    } = pending;
    let location = store.location();

    let result = match store.write(contents).await {
        Ok(()) => {
            info!("settings saved to {location}\n{state}");
            Ok(())
        }
        Err(e) => {
            error!(field = %notification.field, "failed to save settings: {e}");
            Err(e.to_string())
        }
    };

    send_report(
        reports,
        SaveReport {
            notification,
            state,
            location,
            result,
        },
    );
}

fn send_report(reports: Option<&mpsc::UnboundedSender<SaveReport>>, report: SaveReport) {
    if let Some(tx) = reports {
        // A dropped receiver only means nobody is listening any more.
        let _ = tx.send(report);
    }
}
