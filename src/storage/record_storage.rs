//! Asynchronous store that keeps one record per leaf of the tree.
//!
//! A leaf is either a file (record with contents) or an empty directory
//! (record without contents). Loading folds the records back into the
//! nested tree; saving flattens the tree and replaces the whole table with
//! the result in a single backend write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use compio::fs;
use hashlink::LinkedHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::filesystem::{Children, Node, NormalizedPath, Store};
use crate::storage::storage::{
    AsyncStorage, DecodeSnafu, EncodeSnafu, MalformedRecordSnafu, ReadSnafu, StorageError,
    WriteSnafu,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    /// `None` marks an empty directory.
    pub contents: Option<String>,
}

impl FileRecord {
    pub fn file(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: Some(contents.into()),
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: None,
        }
    }
}

/// A keyed record table, addressed by normalized path.
///
/// Futures are driven on the compio runtime and are not required to be
/// `Send`.
#[allow(async_fn_in_trait)]
pub trait RecordBackend {
    async fn get_all(&self) -> Result<Vec<FileRecord>, StorageError>;
    /// Makes `records` the entire table, in the given order. Either the
    /// whole table is replaced or the previous one is left untouched.
    async fn replace_all(&self, records: Vec<FileRecord>) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default)]
pub struct RecordStorage<B> {
    backend: B,
}

impl<B: RecordBackend> RecordStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: RecordBackend> AsyncStorage for RecordStorage<B> {
    async fn load(&self) -> Result<Store, StorageError> {
        let records = self.backend.get_all().await?;
        debug!("Rebuilding tree from {} record(s)", records.len());
        let mut store = Store::default();
        for record in records {
            insert_record(&mut store.files, record)?;
        }
        Ok(store)
    }

    async fn save(&self, store: &Store) -> Result<(), StorageError> {
        let records = flatten(&store.files);
        debug!("Replacing table with {} record(s)", records.len());
        self.backend.replace_all(records).await
    }
}

/// One record per file and per empty directory, in tree order.
pub fn flatten(root: &Children) -> Vec<FileRecord> {
    let mut records = Vec::new();
    flatten_into(root, "", &mut records);
    records
}

fn flatten_into(children: &Children, prefix: &str, records: &mut Vec<FileRecord>) {
    for (name, node) in children {
        let path = format!("{prefix}/{name}");
        match node {
            Node::File(contents) => records.push(FileRecord::file(path, contents.clone())),
            Node::Directory(nested) if nested.is_empty() => {
                records.push(FileRecord::directory(path))
            }
            Node::Directory(nested) => flatten_into(nested, &path, records),
        }
    }
}

fn insert_record(root: &mut Children, record: FileRecord) -> Result<(), StorageError> {
    let path = NormalizedPath::from(record.path.as_str());
    let mut segments = path.segments().collect::<Vec<_>>();
    let Some(name) = segments.pop() else {
        return match record.contents {
            None => Ok(()),
            Some(_) => MalformedRecordSnafu {
                path: record.path,
                reason: "the root cannot hold file contents",
            }
            .fail(),
        };
    };

    let mut parent = root;
    for segment in segments {
        let node = parent
            .entry(segment.to_string())
            .or_insert_with(Node::empty_directory);
        parent = match node {
            Node::Directory(children) => children,
            Node::File(_) => {
                return MalformedRecordSnafu {
                    path: record.path,
                    reason: format!("ancestor '{segment}' is a file"),
                }
                .fail();
            }
        };
    }

    let existing = parent.get(name).map(Node::kind);
    match (existing, record.contents) {
        (Some(kind), None) if kind.is_directory() => Ok(()),
        (None, None) => {
            parent.insert(name.to_string(), Node::empty_directory());
            Ok(())
        }
        (Some(kind), Some(contents)) if kind.is_file() => {
            parent.insert(name.to_string(), Node::File(contents));
            Ok(())
        }
        (None, Some(contents)) => {
            parent.insert(name.to_string(), Node::File(contents));
            Ok(())
        }
        (Some(_), _) => MalformedRecordSnafu {
            path: record.path,
            reason: "a file and a directory share this path",
        }
        .fail(),
    }
}

/// Record table kept in memory. Clones share the table.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecords {
    records: Arc<Mutex<LinkedHashMap<String, Option<String>>>>,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl RecordBackend for MemoryRecords {
    async fn get_all(&self) -> Result<Vec<FileRecord>, StorageError> {
        Ok(self
            .records
            .lock()
            .iter()
            .map(|(path, contents)| FileRecord {
                path: path.clone(),
                contents: contents.clone(),
            })
            .collect())
    }

    async fn replace_all(&self, records: Vec<FileRecord>) -> Result<(), StorageError> {
        let table: LinkedHashMap<_, _> = records
            .into_iter()
            .map(|record| (record.path, record.contents))
            .collect();
        *self.records.lock() = table;
        Ok(())
    }
}

/// Record table persisted as a JSON array file.
#[derive(Debug, Clone)]
pub struct FileRecords {
    path: PathBuf,
}

impl FileRecords {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the table is written to before it replaces `path`.
    fn staging_path(&self) -> PathBuf {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        PathBuf::from(staging)
    }
}

impl RecordBackend for FileRecords {
    async fn get_all(&self) -> Result<Vec<FileRecord>, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(
                    "No record file at {}, starting with an empty table",
                    self.path.best_effort_path_display()
                );
                return Ok(Vec::new());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    path: self.path.clone(),
                });
            }
        };

        serde_json::from_slice(&bytes).context(DecodeSnafu {
            location: self.path.best_effort_path_display(),
        })
    }

    async fn replace_all(&self, records: Vec<FileRecord>) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(&records).context(EncodeSnafu {
            location: self.path.best_effort_path_display(),
        })?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.context(WriteSnafu {
                path: parent.to_path_buf(),
            })?;
        }

        // The record file is only ever replaced by a rename, never truncated.
        let staging = self.staging_path();
        fs::write(&staging, bytes).await.0.context(WriteSnafu {
            path: staging.clone(),
        })?;
        fs::rename(&staging, &self.path).await.context(WriteSnafu {
            path: self.path.clone(),
        })
    }
}
