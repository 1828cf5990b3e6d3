//! Snapshot module: the serialized form of the settings object.

pub mod codec;

pub use codec::{decode_snapshot, encode_snapshot, SnapshotError};
