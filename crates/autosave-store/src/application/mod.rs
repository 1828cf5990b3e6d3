//! Application layer use cases.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (the settings container in `autosave-core`) and the infrastructure (file
//! storage, configuration files).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a goal (e.g., "make every
//!   settings change durable").
//! - **Depend on abstractions** (the `SnapshotStore` trait) rather than concrete
//!   implementations, so the storage can be swapped without changing this code.
//!
//! # Sub-modules
//!
//! - **`persist_on_change`** – Subscribes to the settings container and writes
//!   a full snapshot in the background after every committed change.
//!
//! - **`apply_changes`** – Parses `Name=value` assignments and applies them to
//!   the settings in order (used by the demo harness).
//!
//! - **`restore`** – Picks the starting values from the last snapshot, falling
//!   back to defaults when the file is missing, damaged or restore is off.

pub mod apply_changes;
pub mod persist_on_change;
pub mod restore;
