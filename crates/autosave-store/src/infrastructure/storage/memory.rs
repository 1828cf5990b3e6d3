//! In-memory snapshot store.
//!
//! Records every completed write so tests (and the `--dry-run` harness mode)
//! can inspect what would have reached the disk without touching it.
//!
//! Two knobs make write-ordering behaviour observable:
//!
//! - [`MemoryStore::with_delays`] stalls the n-th write (by call order) for the
//!   given duration before it completes.  Combined with Tokio's paused test
//!   clock this lets a test force an earlier write to finish after a later one.
//! - [`MemoryStore::fail_next`] makes the next `n` writes fail with
//!   [`StorageError::Unavailable`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{SnapshotStore, StorageError};

/// Snapshot store that keeps written documents in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Completed writes, in completion order.
    writes: Mutex<Vec<String>>,
    /// Per-call delays; call `n` uses entry `n`, later calls complete at once.
    delays: Vec<Duration>,
    /// Number of upcoming writes that should fail.
    failures: AtomicUsize,
    /// Number of `write` calls started so far.
    calls: AtomicUsize,
    /// Contents of writes that were started, in call order.
    attempts: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose n-th write sleeps for `delays[n]` before completing.
    pub fn with_delays(delays: Vec<Duration>) -> Self {
        Self {
            delays,
            ..Self::default()
        }
    }

    /// Makes the next `count` writes fail.
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Completed writes, in the order they finished.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().expect("lock poisoned").clone()
    }

    /// The content a file-backed store would hold now: the last completed write.
    pub fn current(&self) -> Option<String> {
        self.writes.lock().expect("lock poisoned").last().cloned()
    }

    /// Number of `write` calls made, including failed and in-flight ones.
    pub fn attempt_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Contents of every attempted write, in the order the writes started.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().expect("lock poisoned").clone()
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn write(&self, contents: String) -> Result<(), StorageError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.attempts
            .lock()
            .expect("lock poisoned")
            .push(contents.clone());

        if self.take_failure() {
            return Err(StorageError::Unavailable(format!(
                "write #{call} rejected by memory store"
            )));
        }

        if let Some(delay) = self.delays.get(call).copied() {
            tokio::time::sleep(delay).await;
        }

        self.writes.lock().expect("lock poisoned").push(contents);
        Ok(())
    }
}
