//! The change notification record.

use crate::domain::field::SettingsField;

/// An immutable record describing one committed field change.
///
/// A notification names *which* field changed, never the old or new value.
/// Subscribers that need the value read it from the state passed alongside the
/// notification, which is already the committed state.
///
/// `sequence` is assigned by the container that emitted the notification and
/// increases by one per committed change, starting at 0.  It makes the delivery
/// order explicit so downstream consumers (such as background writers) can tell
/// which of two snapshots is newer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotification {
    /// The field whose value changed.
    pub field: SettingsField,
    /// Position of this change in the container's mutation history.
    pub sequence: u64,
}

impl ChangeNotification {
    pub fn new(field: SettingsField, sequence: u64) -> Self {
        Self { field, sequence }
    }
}
