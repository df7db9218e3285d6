//! Snapshot persistence for the TalentMatch vector store.

pub mod snapshot;

pub use snapshot::{SnapshotDescription, SnapshotManager, StoreSnapshotData};
