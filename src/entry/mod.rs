//! Entries live in per-owner collections.
//!  - [entities] holds the entry model and its validation rules.
//!  - [log_storage::LogStorageImpl] persists a collection as a JSON lines file per owner.
//!  - [store::EntryStore] keeps the loaded collection in memory and publishes immutable
//!    snapshots to readers.

pub mod entities;
pub mod log_storage;
pub mod store;
