//! # autosave-core
//!
//! Shared library for settings-autosave containing the observable settings
//! container, the change-notification contract, and the JSON snapshot codec.
//!
//! It has zero dependencies on the file system or an async runtime; the
//! persistence trigger that writes snapshots to disk lives in `autosave-store`.
//!
//! # Architecture overview (for beginners)
//!
//! The system keeps a small settings object in memory and makes every change
//! durable the moment it happens, so the latest values survive an abrupt
//! process exit.  The pipeline is:
//!
//! ```text
//! set_field(FieldTwo, true)
//!   └─ compare with stored value ── equal? ──► nothing happens
//!   └─ commit new value
//!   └─ notify subscribers (FIFO)  ──► persistence trigger snapshots + writes
//! ```
//!
//! This crate defines the pieces every layer shares:
//!
//! - **`domain`** – the [`Settings`] container and its declared fields.
//! - **`observe`** – [`ChangeNotification`] and the ordered subscriber list.
//! - **`snapshot`** – how the whole settings object is encoded to JSON and
//!   decoded back.

pub mod domain;
pub mod observe;
pub mod snapshot;

// Re-export the most-used types at the crate root so callers can write
// `autosave_core::Settings` instead of `autosave_core::domain::settings::Settings`.
pub use domain::field::{FieldParseError, SettingsField};
pub use domain::settings::{Settings, SettingsValues};
pub use observe::{ChangeNotification, SubscriptionId};
pub use snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
