use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use snafu::ResultExt;
use tracing::debug;

use crate::filesystem::Store;
use crate::storage::storage::{DecodeSnafu, EncodeSnafu, Storage, StorageError};

pub const DEFAULT_STORAGE_ID: &str = "ufs_main_storage";

/// String-keyed slot table holding one serialized document per storage id.
///
/// Clones share the same table, so every handle pointing at the same id sees
/// the same volume.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
    storage_id: String,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_id(DEFAULT_STORAGE_ID)
    }

    /// Fresh table with a single slot named `storage_id`.
    pub fn with_id(storage_id: impl Into<String>) -> Self {
        Self {
            slots: Arc::default(),
            storage_id: storage_id.into(),
        }
    }

    /// Another handle on the same table, addressing a different slot.
    pub fn slot(&self, storage_id: impl Into<String>) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            storage_id: storage_id.into(),
        }
    }

    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    /// Raw serialized document of this slot, if one was ever written.
    pub fn raw(&self) -> Option<String> {
        self.slots.lock().get(&self.storage_id).cloned()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Store, StorageError> {
        debug!("Loading store from slot '{}'", self.storage_id);
        let raw = {
            let mut slots = self.slots.lock();
            match slots.get(&self.storage_id) {
                Some(raw) => raw.clone(),
                None => {
                    let empty = Store::default().to_json().context(EncodeSnafu {
                        location: self.storage_id.clone(),
                    })?;
                    slots.insert(self.storage_id.clone(), empty.clone());
                    empty
                }
            }
        };
        Store::from_json(&raw).context(DecodeSnafu {
            location: self.storage_id.clone(),
        })
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        debug!("Saving store to slot '{}'", self.storage_id);
        let raw = store.to_json().context(EncodeSnafu {
            location: self.storage_id.clone(),
        })?;
        self.slots.lock().insert(self.storage_id.clone(), raw);
        Ok(())
    }
}
