//! ApplyChanges: drives a sequence of `Name=value` assignments into settings.
//!
//! The demo harness accepts assignments such as `FieldTwo=true` on the command
//! line and applies them in order.  Each assignment goes through
//! [`Settings::set_field`], so the usual rules hold: an assignment that does not
//! change the value is a no-op and triggers no save.

use std::fmt;
use std::str::FromStr;

use autosave_core::{FieldParseError, Settings, SettingsField};
use thiserror::Error;

/// Error returned when an assignment string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("expected NAME=VALUE, got {0:?}")]
    MissingEquals(String),
    #[error(transparent)]
    UnknownField(#[from] FieldParseError),
    #[error("value for {field} must be true or false, got {value:?}")]
    InvalidValue { field: SettingsField, value: String },
}

/// A single `field = value` instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub field: SettingsField,
    pub value: bool,
}

impl Assignment {
    pub fn new(field: SettingsField, value: bool) -> Self {
        Self { field, value }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

impl FromStr for Assignment {
    type Err = AssignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| AssignmentError::MissingEquals(s.to_string()))?;
        let field: SettingsField = name.trim().parse()?;
        let value = match value.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(AssignmentError::InvalidValue {
                    field,
                    value: value.trim().to_string(),
                })
            }
        };
        Ok(Self { field, value })
    }
}

/// The driver used when no assignments are given: leave `FieldOne` at `false`
/// (a no-op on fresh settings) and then switch `FieldTwo` on.
pub fn demo_script() -> Vec<Assignment> {
    vec![
        Assignment::new(SettingsField::FieldOne, false),
        Assignment::new(SettingsField::FieldTwo, true),
    ]
}

/// Applies one assignment, returning `true` if it changed the settings.
pub fn apply(settings: &mut Settings, assignment: Assignment) -> bool {
    settings.set_field(assignment.field, assignment.value)
}
