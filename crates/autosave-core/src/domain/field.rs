//! Field identities for the settings object.
//!
//! Every persisted setting is declared exactly once in [`SettingsField`].  The
//! declaration order of the variants is the order in which fields appear in the
//! human-readable dump (`Settings` implements `Display`) and matches the key
//! order of the JSON snapshot written to disk.
//!
//! # Why a static field list? (for beginners)
//!
//! Some languages walk an object's properties at run time to find out which
//! fields it has.  Rust has no run-time reflection, so instead the set of fields
//! is written down once as an enum.  The compiler then checks every `match` on
//! that enum: adding a new field without handling it everywhere is a compile
//! error rather than a silently missing key in the saved file.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a textual field name does not match any declared field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown settings field: {0:?}")]
pub struct FieldParseError(pub String);

/// Identity of a single declared setting.
///
/// The name returned by [`SettingsField::name`] is stable for the lifetime of
/// the process and is the key used in the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    FieldOne,
    FieldTwo,
}

impl SettingsField {
    /// All declared fields, in declaration order.
    pub const ALL: [SettingsField; 2] = [SettingsField::FieldOne, SettingsField::FieldTwo];

    /// Returns the stable name of this field.
    pub fn name(self) -> &'static str {
        match self {
            SettingsField::FieldOne => "FieldOne",
            SettingsField::FieldTwo => "FieldTwo",
        }
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingsField {
    type Err = FieldParseError;

    /// Parses a field name.  Matching is exact (`"FieldOne"`), with a
    /// case-insensitive fallback so command-line callers may write `fieldone`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingsField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .or_else(|| {
                SettingsField::ALL
                    .iter()
                    .copied()
                    .find(|f| f.name().eq_ignore_ascii_case(s))
            })
            .ok_or_else(|| FieldParseError(s.to_string()))
    }
}
