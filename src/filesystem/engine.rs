use snafu::ResultExt;
use tracing::{debug, trace};

use crate::filesystem::error::{FilesystemError, StorageSnafu};
use crate::filesystem::operations::{self, Persistence};
use crate::filesystem::path::{self, NormalizedPath};
use crate::filesystem::tree::{Listing, Store};
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemOptions {
    /// Directory relative paths resolve against until the first
    /// `change_directory`. Not checked for existence.
    pub starting_directory: NormalizedPath,
}

impl Default for FilesystemOptions {
    fn default() -> Self {
        Self {
            starting_directory: NormalizedPath::root(),
        }
    }
}

/// Virtual filesystem over a synchronous backing store.
///
/// Each call is load, mutate, save within one synchronous call, so it is
/// atomic from the caller's point of view.
#[derive(Debug, Clone)]
pub struct Filesystem<S> {
    storage: S,
    current_directory: NormalizedPath,
}

impl<S: Storage> Filesystem<S> {
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

    /// Moves the current directory. On failure the current directory is
    /// left unchanged.
    pub fn change_directory(&mut self, path: &str) -> Result<NormalizedPath, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("change_directory", Persistence::ReadOnly, |store| {
            operations::require_directory("change_directory", store, &target)
        })?;
        debug!("Changed current directory to {}", target);
        self.current_directory = target.clone();
        Ok(target)
    }

    pub fn read_directory(&self, path: &str) -> Result<Listing, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("read_directory", Persistence::ReadOnly, |store| {
            operations::read_directory(store, &target)
        })
    }

    pub fn read_file(&self, path: &str) -> Result<String, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("read_file", Persistence::ReadOnly, |store| {
            operations::read_file(store, &target)
        })
    }

    pub fn make_directory(&self, path: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Creating directory {}", target);
        self.operate("make_directory", Persistence::Mutating, |store| {
            operations::make_directory(store, &target)
        })
    }

    pub fn write_file(&self, path: &str, contents: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Writing {} byte(s) to {}", contents.len(), target);
        self.operate("write_file", Persistence::Mutating, |store| {
            operations::write_file(store, &target, contents)
        })
    }

    pub fn exists(&self, path: &str) -> Result<bool, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("exists", Persistence::ReadOnly, |store| {
            Ok(operations::exists(store, &target))
        })
    }

    pub fn is_file(&self, path: &str) -> Result<bool, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("is_file", Persistence::ReadOnly, |store| {
            Ok(operations::is_file(store, &target))
        })
    }

    pub fn is_directory(&self, path: &str) -> Result<bool, FilesystemError> {
        let target = self.resolve_path(&[path])?;
        self.operate("is_directory", Persistence::ReadOnly, |store| {
            Ok(operations::is_directory(store, &target))
        })
    }

    pub fn delete_file(&self, path: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Deleting file {}", target);
        self.operate("delete_file", Persistence::Mutating, |store| {
            operations::delete_file(store, &target)
        })
    }

    pub fn delete_directory(&self, path: &str) -> Result<(), FilesystemError> {
        let target = self.resolve_path(&[path])?;
        debug!("Deleting directory {}", target);
        self.operate("delete_directory", Persistence::Mutating, |store| {
            operations::delete_directory(store, &target)
        })
    }

    pub fn rename(&self, path: &str, new_path: &str) -> Result<(), FilesystemError> {
        let from = self.resolve_path(&[path])?;
        let to = self.resolve_path(&[new_path])?;
        debug!("Renaming {} to {}", from, to);
        self.operate("rename", Persistence::Mutating, |store| {
            operations::rename(store, &from, &to)
        })
    }

    /// Loads the tree, applies `operation` and saves the tree back if the
    /// operation mutates and succeeded.
    fn operate<T>(
        &self,
        name: &'static str,
        persistence: Persistence,
        operation: impl FnOnce(&mut Store) -> Result<T, FilesystemError>,
    ) -> Result<T, FilesystemError> {
        trace!("[{name}]");
        let mut store = self.storage.load().context(StorageSnafu { operation: name })?;
        let output = operation(&mut store)?;
        if persistence.should_persist() {
            self.storage
                .save(&store)
                .context(StorageSnafu { operation: name })?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::filesystem::error::ErrorKind;
    use crate::filesystem::tree::EntryKind;
    use crate::storage::{MemoryStorage, StorageError};

    #[fixture]
    fn filesystem() -> Filesystem<MemoryStorage> {
        Filesystem::new(MemoryStorage::new())
    }

    #[rstest]
    fn starts_at_root(filesystem: Filesystem<MemoryStorage>) {
        assert_eq!(filesystem.get_current_directory().as_str(), "/");
        assert!(filesystem.exists("/").unwrap());
        assert!(filesystem.read_directory("/").unwrap().is_empty());
    }

    #[rstest]
    fn scenario_directory_with_one_file(filesystem: Filesystem<MemoryStorage>) {
        filesystem.make_directory("/a").unwrap();
        filesystem.write_file("/a/b.txt", "hello").unwrap();

        let listing = filesystem.read_directory("/a").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.get("b.txt"), Some(&EntryKind::File));
        assert_eq!(filesystem.read_file("/a/b.txt").unwrap(), "hello");

        filesystem.rename("/a/b.txt", "/a/c.txt").unwrap();
        assert_eq!(filesystem.read_file("/a/c.txt").unwrap(), "hello");
        assert!(!filesystem.exists("/a/b.txt").unwrap());

        filesystem.delete_directory("/a").unwrap();
        assert!(!filesystem.exists("/a").unwrap());
        assert!(!filesystem.exists("/a/c.txt").unwrap());
    }

    #[rstest]
    fn relative_paths_follow_current_directory(mut filesystem: Filesystem<MemoryStorage>) {
        filesystem.make_directory("/home").unwrap();
        filesystem.make_directory("/home/user").unwrap();

        let current = filesystem.change_directory("/home/user/").unwrap();
        assert_eq!(current.as_str(), "/home/user");

        filesystem.write_file("notes.txt", "n").unwrap();
        assert!(filesystem.is_file("/home/user/notes.txt").unwrap());
        assert_eq!(
            filesystem.resolve_path(&["relative/path"]).unwrap().as_str(),
            "/home/user/relative/path"
        );

        filesystem.change_directory("..").unwrap();
        assert_eq!(filesystem.get_current_directory().as_str(), "/home");
        assert_eq!(filesystem.read_file("user/notes.txt").unwrap(), "n");
    }

    #[rstest]
    #[case("/nonexistent", ErrorKind::NotFound)]
    #[case("/file.txt", ErrorKind::NotADirectory)]
    fn failed_change_directory_keeps_current_directory(
        mut filesystem: Filesystem<MemoryStorage>,
        #[case] destination: &str,
        #[case] kind: ErrorKind,
    ) {
        filesystem.make_directory("/start").unwrap();
        filesystem.write_file("/file.txt", "x").unwrap();
        filesystem.change_directory("/start").unwrap();

        let error = filesystem.change_directory(destination).unwrap_err();

        assert_eq!(error.kind(), kind);
        assert!(error.to_string().contains(destination));
        assert_eq!(filesystem.get_current_directory().as_str(), "/start");
    }

    #[rstest]
    fn queries_do_not_write_to_storage(filesystem: Filesystem<MemoryStorage>) {
        filesystem.write_file("/a.txt", "a").unwrap();
        let before = filesystem.storage().raw();

        filesystem.exists("/a.txt").unwrap();
        filesystem.is_file("/a.txt").unwrap();
        filesystem.is_directory("/a.txt").unwrap();
        filesystem.read_file("/a.txt").unwrap();
        filesystem.read_directory("/").unwrap();

        assert_eq!(filesystem.storage().raw(), before);
    }

    #[rstest]
    fn failed_mutation_is_not_persisted(filesystem: Filesystem<MemoryStorage>) {
        filesystem.make_directory("/dir").unwrap();
        let before = filesystem.storage().raw();

        let error = filesystem.write_file("/dir", "x").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::IsADirectory);
        assert_eq!(filesystem.storage().raw(), before);
    }

    #[test]
    fn engines_on_one_volume_see_each_others_writes() {
        let storage = MemoryStorage::with_id("shared");
        let first = Filesystem::new(storage.clone());
        let second = Filesystem::new(storage.clone());
        let isolated = Filesystem::new(storage.slot("private"));

        first.write_file("/greeting", "hi").unwrap();

        assert_eq!(second.read_file("/greeting").unwrap(), "hi");
        assert!(!isolated.exists("/greeting").unwrap());
    }

    #[test]
    fn starting_directory_option_is_used_for_relative_paths() {
        let filesystem = Filesystem::with_options(
            MemoryStorage::new(),
            FilesystemOptions {
                starting_directory: NormalizedPath::from("/srv"),
            },
        );
        assert_eq!(filesystem.resolve_path(&["x"]).unwrap().as_str(), "/srv/x");
    }

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn load(&self) -> Result<Store, StorageError> {
            Ok(Store::default())
        }

        fn save(&self, _store: &Store) -> Result<(), StorageError> {
            Err(StorageError::MalformedRecordError {
                path: "/".into(),
                reason: "refusing to save".into(),
            })
        }
    }

    #[test]
    fn storage_failures_surface_with_operation_name() {
        let filesystem = Filesystem::new(BrokenStorage);

        assert!(!filesystem.exists("/x").unwrap());
        let error = filesystem.make_directory("/x").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Storage);
        assert_eq!(error.operation(), "make_directory");
    }
}
