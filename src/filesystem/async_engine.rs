use snafu::ResultExt;
use tracing::{debug, trace};

use crate::filesystem::engine::FilesystemOptions;
use crate::filesystem::error::{FilesystemError, StorageSnafu};
use crate::filesystem::operations::{self, Persistence};
use crate::filesystem::path::{self, NormalizedPath};
use crate::filesystem::tree::{Listing, Store};
use crate::storage::AsyncStorage;

/// Virtual filesystem over a backing store whose I/O suspends.
///
/// `load` and `save` are awaited in full around each node operation, but no
/// transaction spans them: two overlapping mutating calls on one volume can
/// lose an update. Callers that mutate concurrently serialize externally.
#[derive(Debug, Clone)]
pub struct AsyncFilesystem<S> {
    storage: S,
    current_directory: NormalizedPath,
}

impl<S: AsyncStorage> AsyncFilesystem<S> {
    pub fn new(storage: S) -> Self {
        Self::with_options(storage, FilesystemOptions::default())
    }

    pub fn with_options(storage: S, options: FilesystemOptions) -> Self {
        Self {
            storage,
            current_directory: options.starting_directory,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn resolve_path<P: AsRef<str>>(
        &self,
        fragments: &[P],
    ) -> Result<NormalizedPath, FilesystemError> {
        path::resolve(&self.current_directory, fragments)
    }

    pub fn get_current_directory(&self) -> NormalizedPath {
        trace!("[get_current_directory]");
        self.current_directory.clone()
    }

    pub async fn change_directory(&mut self, path: &str) -> Result<NormalizedPath, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("change_directory", Persistence::ReadOnly, |store| {
            operations::require_directory("change_directory", store, &target)
        })
        .await?;
        debug!("Changed current directory to {}", target);
        self.current_directory = target.clone();
        Ok(target)
    }

    pub async fn read_directory(&self, path: &str) -> Result<Listing, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("read_directory", Persistence::ReadOnly, |store| {
            operations::read_directory(store, &target)
        })
        .await
    }

    pub async fn read_file(&self, path: &str) -> Result<String, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("read_file", Persistence::ReadOnly, |store| {
            operations::read_file(store, &target)
        })
        .await
    }

    pub async fn make_directory(&self, path: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Creating directory {}", target);
        self.operate("make_directory", Persistence::Mutating, |store| {
            operations::make_directory(store, &target)
        })
        .await
    }

    pub async fn write_file(&self, path: &str, contents: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Writing {} byte(s) to {}", contents.len(), target);
        self.operate("write_file", Persistence::Mutating, |store| {
            operations::write_file(store, &target, contents)
        })
        .await
    }

    pub async fn exists(&self, path: &str) -> Result<bool, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("exists", Persistence::ReadOnly, |store| {
            Ok(operations::exists(store, &target))
        })
        .await
    }

    pub async fn is_file(&self, path: &str) -> Result<bool, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("is_file", Persistence::ReadOnly, |store| {
            Ok(operations::is_file(store, &target))
        })
        .await
    }

    pub async fn is_directory(&self, path: &str) -> Result<bool, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("is_directory", Persistence::ReadOnly, |store| {
            Ok(operations::is_directory(store, &target))
        })
        .await
    }

    pub async fn delete_file(&self, path: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Deleting file {}", target);
        self.operate("delete_file", Persistence::Mutating, |store| {
            operations::delete_file(store, &target)
        })
        .await
    }

    pub async fn delete_directory(&self, path: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Deleting directory {}", target);
        self.operate("delete_directory", Persistence::Mutating, |store| {
            operations::delete_directory(store, &target)
        })
        .await
    }

    pub async fn rename(&self, path: &str, new_path: &str) -> Result<(), FilesystemError> {
        let from = self.resolve_path(&[path])?;
        let to = self.resolve_path(&[new_path])?;
        debug!("Renaming {} to {}", from, to);
        self.operate("rename", Persistence::Mutating, |store| {
            operations::rename(store, &from, &to)
        })
        .await
    }

    async fn operate<T>(
        &self,
        name: &'static str,
        persistence: Persistence,
        operation: impl FnOnce(&mut Store) -> Result<T, FilesystemError>,
    ) -> Result<T, FilesystemError> {
        trace!("[{name}]");
        let mut store = self
            .storage
            .load()
            .await
            .context(StorageSnafu { operation: name })?;
        let output = operation(&mut store)?;
        if persistence.should_persist() {
            self.storage
                .save(&store)
                .await
                .context(StorageSnafu { operation: name })?;
        }
        Ok(output)
    }
}
