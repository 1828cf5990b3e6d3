//! Infrastructure layer for the autosave store.
//!
//! Contains the OS-facing adapters: snapshot storage (file and in-memory) and
//! configuration file loading.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `autosave_core`, but MUST NOT be imported by the domain layer.

pub mod storage;
