//! JSON codec for settings snapshots.
//!
//! On-disk format:
//! ```json
//! {
//!   "FieldOne": false,
//!   "FieldTwo": true
//! }
//! ```
//! UTF-8, one key per declared field in declaration order, booleans as JSON
//! `true`/`false`, two-space indentation, no trailing newline.
//!
//! Encoding is deterministic: the same [`SettingsValues`] always produces the
//! same bytes, so saving an unchanged state twice leaves the file identical.

use thiserror::Error;

use crate::domain::settings::SettingsValues;

/// Errors that can occur while encoding or decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The settings could not be serialized to JSON.
    #[error("failed to encode settings snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// The text is not a valid settings snapshot (bad JSON, or a field with
    /// the wrong JSON type).
    #[error("failed to decode settings snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes `values` into the pretty-printed JSON snapshot format.
///
/// # Errors
///
/// Returns [`SnapshotError::Encode`] if serialization fails.
///
/// # Examples
///
/// ```rust
/// use autosave_core::{encode_snapshot, SettingsValues};
///
/// let json = encode_snapshot(&SettingsValues { field_one: false, field_two: true }).unwrap();
/// assert_eq!(json, "{\n  \"FieldOne\": false,\n  \"FieldTwo\": true\n}");
/// ```
pub fn encode_snapshot(values: &SettingsValues) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(values).map_err(SnapshotError::Encode)
}

/// Decodes a snapshot previously produced by [`encode_snapshot`].
///
/// Missing keys take their default (`false`); unknown keys are ignored, so a
/// file written by a newer or older build still loads.
///
/// # Errors
///
/// Returns [`SnapshotError::Decode`] if `text` is not a JSON object or a known
/// key holds a non-boolean value.
pub fn decode_snapshot(text: &str) -> Result<SettingsValues, SnapshotError> {
    serde_json::from_str(text).map_err(SnapshotError::Decode)
}
