//! Backing stores for the persisted `{ "files": ... }` document.
//!
//! Engines only ever see the [`Storage`] or [`AsyncStorage`] capability: a
//! `load` before each operation and a `save` after each mutating one.

mod json_file_storage;
mod memory_storage;
mod record_storage;
mod storage;

pub use json_file_storage::JsonFileStorage;
pub use memory_storage::{DEFAULT_STORAGE_ID, MemoryStorage};
pub use record_storage::{FileRecord, FileRecords, MemoryRecords, RecordBackend, RecordStorage};
pub use storage::{AsyncStorage, Storage, StorageError};
