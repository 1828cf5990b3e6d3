//! Integration tests for the autosave-core notification → snapshot pipeline.
//!
//! These tests drive the public API only: a [`Settings`] container, a
//! subscriber that encodes the state it is handed, and the snapshot decoder.

use std::sync::{Arc, Mutex};

use autosave_core::{
    decode_snapshot, encode_snapshot, ChangeNotification, Settings, SettingsField, SettingsValues,
};

/// Attaches a subscriber that encodes a snapshot on every notification, the
/// same way the persistence trigger does, and returns the captured documents.
fn capture_snapshots(settings: &mut Settings) -> Arc<Mutex<Vec<(ChangeNotification, String)>>> {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);
    settings.subscribe(move |state, notification| {
        let json = encode_snapshot(state).expect("encode must succeed");
        sink.lock().unwrap().push((*notification, json));
    });
    captured
}

#[test]
fn test_snapshot_after_single_change_contains_all_fields() {
    // Arrange
    let mut settings = Settings::new();
    let captured = capture_snapshots(&mut settings);

    // Act
    settings.set_field_two(true);

    // Assert
    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let parsed: serde_json::Value = serde_json::from_str(&captured[0].1).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!({ "FieldOne": false, "FieldTwo": true })
    );
}

#[test]
fn test_every_snapshot_decodes_to_state_at_dispatch() {
    // Arrange
    let mut settings = Settings::new();
    let captured = capture_snapshots(&mut settings);
    let steps = [
        (SettingsField::FieldOne, true),
        (SettingsField::FieldTwo, true),
        (SettingsField::FieldOne, false),
        (SettingsField::FieldTwo, false),
    ];

    // Act
    let mut expected = Vec::new();
    for (field, value) in steps {
        settings.set_field(field, value);
        expected.push(*settings.values());
    }

    // Assert
    let captured = captured.lock().unwrap();
    let decoded: Vec<SettingsValues> = captured
        .iter()
        .map(|(_, json)| decode_snapshot(json).expect("decode must succeed"))
        .collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_no_snapshot_for_repeated_equal_sets() {
    let mut settings = Settings::new();
    let captured = capture_snapshots(&mut settings);

    for _ in 0..5 {
        settings.set_field_one(false);
        settings.set_field_two(false);
    }

    assert!(captured.lock().unwrap().is_empty());
}

#[test]
fn test_notification_names_only_the_changed_field() {
    let mut settings = Settings::new();
    let captured = capture_snapshots(&mut settings);

    settings.set_field_one(true);

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].0.field, SettingsField::FieldOne);
}

#[test]
fn test_restored_container_reproduces_persisted_state() {
    // Arrange: a container that has been mutated and its last snapshot
    let mut original = Settings::new();
    let captured = capture_snapshots(&mut original);
    original.set_field_one(true);
    let last = captured.lock().unwrap().last().cloned().expect("one snapshot");

    // Act
    let restored = Settings::with_values(decode_snapshot(&last.1).expect("decode"));

    // Assert
    assert_eq!(restored.values(), original.values());
    assert_eq!(restored.to_string(), original.to_string());
}
