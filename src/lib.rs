//! Unified filesystem interface over a persisted JSON tree.
//!
//! The tree lives in a swappable backing store: an in-memory slot table, a
//! JSON file, or an asynchronous record table. [`Filesystem`] drives the
//! synchronous stores and [`AsyncFilesystem`] the asynchronous ones; both
//! expose the same operations.

#![allow(clippy::enum_variant_names)]

mod ext;
pub mod filesystem;
pub mod storage;

pub use filesystem::{
    AsyncFilesystem, EntryKind, ErrorKind, Filesystem, FilesystemError, FilesystemOptions,
    Listing, Node, NormalizedPath, Store,
};
pub use storage::{
    AsyncStorage, FileRecords, JsonFileStorage, MemoryRecords, MemoryStorage, RecordStorage,
    Storage, StorageError,
};
