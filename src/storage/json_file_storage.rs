use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use snafu::ResultExt;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;
use crate::filesystem::Store;
use crate::storage::storage::{
    DecodeSnafu, EncodeSnafu, ReadSnafu, Storage, StorageError, WriteSnafu,
};

/// Keeps the whole document in one JSON file on the host filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Store, StorageError> {
        debug!("Reading store file {}", self.path.best_effort_path_display());
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!(
                    "No store file at {}, starting with an empty tree",
                    self.path.best_effort_path_display()
                );
                return Ok(Store::default());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    path: self.path.clone(),
                });
            }
        };

        Store::from_json(&contents).context(DecodeSnafu {
            location: self.path.best_effort_path_display(),
        })
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        debug!("Writing store file {}", self.path.best_effort_path_display());
        let contents = store.to_json_pretty().context(EncodeSnafu {
            location: self.path.best_effort_path_display(),
        })?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).context(WriteSnafu {
            path: parent.to_path_buf(),
        })?;

        // Staged next to the target and renamed over it, so a failed write
        // never truncates the previous document.
        let mut staging = NamedTempFile::new_in(parent).context(WriteSnafu {
            path: parent.to_path_buf(),
        })?;
        staging
            .write_all(contents.as_bytes())
            .context(WriteSnafu {
                path: staging.path().to_path_buf(),
            })?;
        staging
            .persist(&self.path)
            .map_err(|error| error.error)
            .context(WriteSnafu {
                path: self.path.clone(),
            })?;
        Ok(())
    }
}
