//! Domain entities for settings-autosave.
//!
//! This module contains the settings object itself and has no infrastructure
//! dependencies: no file system, no async runtime, no logging back-end.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code holds the core rules of the
//! application (here: "a field change is only a change if the value differs,
//! and subscribers hear about it after the value is committed") and can be
//! compiled and tested on any platform without any external setup.
//!
//! Outer layers (the persistence trigger, file storage, the demo binary) depend
//! on the domain; the domain never depends on them.

/// Declared field identities.
pub mod field;

/// The observable settings container.
///
/// See [`settings::Settings`] for the main type.
pub mod settings;
