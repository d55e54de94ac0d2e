use std::path::PathBuf;

use snafu::Snafu;

use crate::ext::BestEffortPathExt;
use crate::filesystem::Store;

/// Synchronous backing store. `load` and `save` complete before returning.
pub trait Storage {
    fn load(&self) -> Result<Store, StorageError>;
    /// Replaces the stored document. On failure the previously saved
    /// document is left intact.
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}

/// Backing store whose I/O suspends.
///
/// No transaction spans a `load` and the following `save`, so concurrent
/// mutating callers on one volume must serialize themselves. Futures are
/// driven on the compio runtime and are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait AsyncStorage {
    async fn load(&self) -> Result<Store, StorageError>;
    /// Replaces the stored document. On failure the previously saved
    /// document is left intact.
    async fn save(&self, store: &Store) -> Result<(), StorageError>;
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("Failed to read the store from {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write the store to {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Stored document '{}' is not a valid filesystem tree", location))]
    DecodeError {
        location: String,
        source: serde_json::Error,
    },
    #[snafu(display("Failed to encode the filesystem tree for '{}'", location))]
    EncodeError {
        location: String,
        source: serde_json::Error,
    },
    #[snafu(display("Record '{}' does not fit into the tree: {}", path, reason))]
    MalformedRecordError { path: String, reason: String },
}
