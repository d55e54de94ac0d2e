//! Virtual filesystem over a single persisted tree.
//!
//! Directories are nested maps, files are string payloads. Every public
//! operation resolves its path against the engine's current directory,
//! loads the tree from storage, applies one node operation and saves the
//! tree back when the operation mutated it.

mod async_engine;
mod engine;
mod error;
mod navigator;
mod operations;
mod path;
mod tree;

pub use async_engine::AsyncFilesystem;
pub use engine::{Filesystem, FilesystemOptions};
pub use error::{ErrorKind, FilesystemError};
pub use navigator::{Blocked, Location, locate};
pub use path::{NormalizedPath, resolve};
pub use tree::{Children, EntryKind, FILE_MARKER, Listing, Node, Store};
