//! The observable settings object.
//!
//! [`Settings`] owns the current field values ([`SettingsValues`]) and the list
//! of change subscribers.  Every mutation goes through [`Settings::set_field`],
//! which enforces the container contract:
//!
//! 1. Compare the new value with the stored one.
//! 2. Equal → return without touching anything (no notification, no sequence
//!    number consumed).
//! 3. Different → commit the new value, *then* notify every subscriber in
//!    registration order.
//!
//! Because the commit happens before delivery, a subscriber that reads the
//! state it is handed always sees the new value already in effect.  This is the
//! property the persistence trigger relies on to snapshot the whole object.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use autosave_core::{Settings, SettingsField};
//!
//! let mut settings = Settings::new();
//! let changed = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&changed);
//! settings.subscribe(move |_, n| sink.lock().unwrap().push(n.field));
//!
//! settings.set_field_one(false); // equal to the default: no-op
//! settings.set_field_two(true);
//!
//! assert_eq!(*changed.lock().unwrap(), vec![SettingsField::FieldTwo]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::field::SettingsField;
use crate::observe::{ChangeNotification, SubscriberList, SubscriptionId};

/// Plain value snapshot of every declared field.
///
/// This is the type that gets serialized.  `serde` walks the struct fields in
/// declaration order, which keeps the JSON key order stable.  Keys are the
/// PascalCase field names (`"FieldOne"`), matching [`SettingsField::name`].
///
/// `#[serde(default)]` lets a snapshot written by an older build (missing a
/// newer field) still load; absent fields fall back to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SettingsValues {
    pub field_one: bool,
    pub field_two: bool,
}

impl SettingsValues {
    /// Returns the value of `field`.
    pub fn get(&self, field: SettingsField) -> bool {
        match field {
            SettingsField::FieldOne => self.field_one,
            SettingsField::FieldTwo => self.field_two,
        }
    }

    fn slot_mut(&mut self, field: SettingsField) -> &mut bool {
        match field {
            SettingsField::FieldOne => &mut self.field_one,
            SettingsField::FieldTwo => &mut self.field_two,
        }
    }
}

impl fmt::Display for SettingsValues {
    /// One `Name - value` line per field, in declaration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in SettingsField::ALL {
            writeln!(f, "{} - {}", field, self.get(field))?;
        }
        Ok(())
    }
}

/// Observable settings container.
///
/// Constructed once per process and mutated for the rest of its lifetime.
/// There is no explicit teardown: attaching a persistence trigger makes every
/// committed change durable as it happens.
#[derive(Debug, Default)]
pub struct Settings {
    values: SettingsValues,
    subscribers: SubscriberList<SettingsValues>,
    next_sequence: u64,
}

impl Settings {
    /// Creates a settings object with every field at its default (`false`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a settings object seeded with `values`.
    ///
    /// Seeding is not a mutation: no notification is emitted.  Used to restore
    /// a previously persisted snapshot on start-up.
    pub fn with_values(values: SettingsValues) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Current value of every field.
    pub fn values(&self) -> &SettingsValues {
        &self.values
    }

    /// Current value of `field`.
    pub fn get(&self, field: SettingsField) -> bool {
        self.values.get(field)
    }

    pub fn field_one(&self) -> bool {
        self.values.field_one
    }

    pub fn field_two(&self) -> bool {
        self.values.field_two
    }

    pub fn set_field_one(&mut self, value: bool) -> bool {
        self.set_field(SettingsField::FieldOne, value)
    }

    pub fn set_field_two(&mut self, value: bool) -> bool {
        self.set_field(SettingsField::FieldTwo, value)
    }

    /// Sets `field` to `value`, notifying subscribers if the value changed.
    ///
    /// Returns `true` if the value changed (and a notification was delivered),
    /// `false` if `value` equalled the stored value and nothing happened.
    pub fn set_field(&mut self, field: SettingsField, value: bool) -> bool {
        let slot = self.values.slot_mut(field);
        if *slot == value {
            trace!(%field, value, "value unchanged; skipping notification");
            return false;
        }
        *slot = value;

        let notification = ChangeNotification::new(field, self.next_sequence);
        self.next_sequence += 1;

        debug!(
            %field,
            value,
            sequence = notification.sequence,
            subscribers = self.subscribers.len(),
            "settings field changed"
        );
        self.subscribers.notify(&self.values, &notification);
        true
    }

    /// Registers a change handler.  Handlers are called in registration order.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&SettingsValues, &ChangeNotification) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(handler)
    }

    /// Removes a handler previously returned by [`Settings::subscribe`].
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Number of registered change handlers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.values, f)
    }
}
