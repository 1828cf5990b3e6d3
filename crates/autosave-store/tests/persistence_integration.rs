//! Integration tests for the change → snapshot → storage pipeline.
//!
//! These tests exercise the public API of autosave-store end-to-end:
//! `Settings` + `PersistenceTrigger` + a real `JsonFileStore` on a temp
//! directory, or a `MemoryStore` with injected delays and failures.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use autosave_core::{decode_snapshot, Settings, SettingsField, SettingsValues};
use autosave_store::application::persist_on_change::{
    PersistenceTrigger, SaveReport, WriteOrdering,
};
use autosave_store::infrastructure::storage::{json_file::JsonFileStore, memory::MemoryStore};
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("autosave_it_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn attach_file_store(
    settings: &mut Settings,
    path: PathBuf,
    ordering: WriteOrdering,
) -> UnboundedReceiver<SaveReport> {
    let (trigger, reports) =
        PersistenceTrigger::new(Arc::new(JsonFileStore::new(path)), ordering).with_reports();
    trigger.attach(settings).expect("attach inside runtime");
    reports
}

fn attach_memory_store(
    settings: &mut Settings,
    store: Arc<MemoryStore>,
    ordering: WriteOrdering,
) -> UnboundedReceiver<SaveReport> {
    let (trigger, reports) = PersistenceTrigger::new(store, ordering).with_reports();
    trigger.attach(settings).expect("attach inside runtime");
    reports
}

// ── Snapshot completeness ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_changing_one_field_persists_all_fields() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("settings.json");
    let mut settings = Settings::new();
    let mut reports = attach_file_store(&mut settings, path.clone(), WriteOrdering::Racy);

    // Act
    settings.set_field_two(true);
    let report = reports.recv().await.expect("save report");

    // Assert
    assert!(report.is_success(), "save failed: {:?}", report.result);
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        on_disk,
        serde_json::json!({ "FieldOne": false, "FieldTwo": true })
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_persisted_file_round_trips_to_dispatched_state() {
    // Arrange
    let dir = temp_dir();
    let path = dir.join("settings.json");
    let mut settings = Settings::new();
    let mut reports = attach_file_store(&mut settings, path.clone(), WriteOrdering::Queued);

    // Act
    settings.set_field_one(true);
    settings.set_field_two(true);
    let _first = reports.recv().await.expect("first report");
    let last = reports.recv().await.expect("second report");

    // Assert
    let restored = JsonFileStore::new(&path)
        .load()
        .await
        .expect("load")
        .expect("file exists");
    assert_eq!(restored, last.state);
    assert_eq!(restored, *settings.values());

    std::fs::remove_dir_all(&dir).ok();
}

// ── No-op on equal value ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_equal_sets_produce_no_writes() {
    // Arrange
    let store = Arc::new(MemoryStore::new());
    let mut settings = Settings::new();
    let mut reports = attach_memory_store(&mut settings, Arc::clone(&store), WriteOrdering::Racy);

    // Act
    for _ in 0..10 {
        settings.set_field_one(false);
        settings.set_field_two(false);
    }
    drop(settings);

    // Assert
    assert!(reports.recv().await.is_none(), "no save may be reported");
    assert_eq!(store.attempt_count(), 0);
}

// ── Failure isolation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_write_does_not_affect_memory_and_later_save_succeeds() {
    // Arrange: the parent directory does not exist yet, so the first write fails
    let dir = std::env::temp_dir().join(format!("autosave_it_{}", Uuid::new_v4()));
    let path = dir.join("settings.json");
    let mut settings = Settings::new();
    let mut reports = attach_file_store(&mut settings, path.clone(), WriteOrdering::Racy);

    // Act 1: the mutation completes even though its save fails
    assert!(settings.set_field_one(true));
    let failed = reports.recv().await.expect("first report");

    // Assert 1
    assert!(!failed.is_success());
    assert!(settings.field_one());
    assert!(!path.exists());

    // Act 2: storage becomes available; the next mutation saves again
    std::fs::create_dir_all(&dir).unwrap();
    assert!(settings.set_field_two(true));
    let saved = reports.recv().await.expect("second report");

    // Assert 2
    assert!(saved.is_success(), "save failed: {:?}", saved.result);
    let restored = decode_snapshot(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        restored,
        SettingsValues {
            field_one: true,
            field_two: true,
        }
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_store_failure_is_reported_with_its_message() {
    let store = Arc::new(MemoryStore::new());
    store.fail_next(1);
    let mut settings = Settings::new();
    let mut reports = attach_memory_store(&mut settings, Arc::clone(&store), WriteOrdering::Racy);

    settings.set_field_one(true);
    let report = reports.recv().await.expect("report");

    assert_eq!(report.notification.field, SettingsField::FieldOne);
    assert_eq!(report.location, "memory");
    let message = report.result.expect_err("write must fail");
    assert!(message.contains("storage unavailable"), "{message}");
    assert!(store.current().is_none());
}

// ── Idempotence ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_same_state_saved_twice_is_byte_identical() {
    // Arrange
    let store = Arc::new(MemoryStore::new());
    let mut settings = Settings::new();
    let mut reports = attach_memory_store(&mut settings, Arc::clone(&store), WriteOrdering::Queued);

    // Act: true → false → true leaves FieldOne at the same value twice
    settings.set_field_one(true);
    settings.set_field_one(false);
    settings.set_field_one(true);
    for _ in 0..3 {
        reports.recv().await.expect("report");
    }

    // Assert
    let writes = store.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0].as_bytes(), writes[2].as_bytes());
    assert_ne!(writes[0], writes[1]);
}

// ── Write ordering ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_racy_ordering_lets_slow_earlier_write_win() {
    // Arrange: the first write stalls longer than the second
    let store = Arc::new(MemoryStore::with_delays(vec![
        Duration::from_millis(100),
        Duration::from_millis(10),
    ]));
    let mut settings = Settings::new();
    let mut reports = attach_memory_store(&mut settings, Arc::clone(&store), WriteOrdering::Racy);

    // Act
    settings.set_field_one(true);
    settings.set_field_two(true);
    let first_done = reports.recv().await.expect("report");
    let second_done = reports.recv().await.expect("report");

    // Assert: completion order is reversed and the file ends up stale
    assert_eq!(first_done.notification.sequence, 1);
    assert_eq!(second_done.notification.sequence, 0);
    let final_state = decode_snapshot(&store.current().expect("written")).unwrap();
    assert_eq!(
        final_state,
        SettingsValues {
            field_one: true,
            field_two: false,
        }
    );
    assert_ne!(final_state, *settings.values());
}

#[tokio::test(start_paused = true)]
async fn test_queued_ordering_converges_to_last_change() {
    // Arrange: same delays as the racy case
    let store = Arc::new(MemoryStore::with_delays(vec![
        Duration::from_millis(100),
        Duration::from_millis(10),
    ]));
    let mut settings = Settings::new();
    let mut reports =
        attach_memory_store(&mut settings, Arc::clone(&store), WriteOrdering::Queued);

    // Act
    settings.set_field_one(true);
    settings.set_field_two(true);
    let first_done = reports.recv().await.expect("report");
    let second_done = reports.recv().await.expect("report");

    // Assert
    assert_eq!(first_done.notification.sequence, 0);
    assert_eq!(second_done.notification.sequence, 1);
    let final_state = decode_snapshot(&store.current().expect("written")).unwrap();
    assert_eq!(final_state, *settings.values());
}

#[tokio::test(start_paused = true)]
async fn test_setter_returns_before_write_completes() {
    // Arrange
    let store = Arc::new(MemoryStore::with_delays(vec![Duration::from_secs(5)]));
    let mut settings = Settings::new();
    let mut reports = attach_memory_store(&mut settings, Arc::clone(&store), WriteOrdering::Racy);

    // Act
    settings.set_field_two(true);

    // Assert: the value is committed while the write is still pending
    assert!(settings.field_two());
    assert!(store.current().is_none());
    reports.recv().await.expect("report");
    assert!(store.current().is_some());
}

// ── Restore ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_restart_restores_last_saved_state() {
    // Arrange: a first "process" saves a change
    let dir = temp_dir();
    let path = dir.join("settings.json");
    {
        let mut settings = Settings::new();
        let mut reports = attach_file_store(&mut settings, path.clone(), WriteOrdering::Racy);
        settings.set_field_one(true);
        reports.recv().await.expect("report");
    }

    // Act: a second "process" restores from the same file
    let values = JsonFileStore::new(&path)
        .load()
        .await
        .expect("load")
        .unwrap_or_default();
    let restored = Settings::with_values(values);

    // Assert
    assert!(restored.field_one());
    assert!(!restored.field_two());

    std::fs::remove_dir_all(&dir).ok();
}
