//! Where definition bodies live. The store picks one backend when it is
//! built and never branches on it afterwards.

use std::{
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::debug;

use super::{
    StoreError,
    indices::{SecondaryIndices, Slot},
};
use crate::definition::Definition;

const DEFINITIONS_DIR: &str = "defs";
const INDICES_FILE: &str = "indices.json";
const INDEX_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    Disk,
}

impl fmt::Display for StorageKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            StorageKind::Disk => f.write_str("disk"),
        }
    }
}

/// Persisted view of the lookup tables.
#[derive(Debug, Serialize)]
pub struct IndexSnapshot<'a> {
    pub schema_version: u32,
    pub next_slot: Slot,
    pub definitions: usize,
    pub indices: &'a SecondaryIndices,
}

impl<'a> IndexSnapshot<'a> {
    pub fn new(
        next_slot: Slot,
        definitions: usize,
        indices: &'a SecondaryIndices,
    ) -> Self {
        Self {
            schema_version: INDEX_SCHEMA_VERSION,
            next_slot,
            definitions,
            indices,
        }
    }
}

pub trait DefinitionStorage: Send + Sync + fmt::Debug {
    fn kind(&self) -> StorageKind;

    fn put(
        &mut self,
        slot: Slot,
        definition: Definition,
    ) -> Result<(), StoreError>;

    fn get(
        &self,
        slot: Slot,
    ) -> Result<Arc<Definition>, StoreError>;

    fn delete(
        &mut self,
        slot: Slot,
    ) -> Result<(), StoreError>;

    fn clear(&mut self) -> Result<(), StoreError>;

    /// Called after `init` and batch updates, and on flush when single
    /// mutations left the lookup tables dirty.
    fn persist_indices(
        &mut self,
        _snapshot: &IndexSnapshot<'_>,
    ) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    definitions: HashMap<Slot, Arc<Definition>>,
}

impl DefinitionStorage for MemoryStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }

    fn put(
        &mut self,
        slot: Slot,
        definition: Definition,
    ) -> Result<(), StoreError> {
        self.definitions.insert(slot, Arc::new(definition));
        Ok(())
    }

    fn get(
        &self,
        slot: Slot,
    ) -> Result<Arc<Definition>, StoreError> {
        self.definitions.get(&slot).cloned().ok_or(StoreError::MissingSlot(slot))
    }

    fn delete(
        &mut self,
        slot: Slot,
    ) -> Result<(), StoreError> {
        self.definitions.remove(&slot);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.definitions.clear();
        Ok(())
    }
}

/// One JSON file per definition under `<root>/defs`, plus an index
/// snapshot at `<root>/indices.json`.
#[derive(Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage = Self {
            root: root.into(),
        };
        let dir = storage.definitions_dir();
        std::fs::create_dir_all(&dir).map_err(|error| StoreError::io(&dir, error))?;
        debug!("[store] disk storage at {}", storage.root.display());
        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn indices_path(&self) -> PathBuf {
        self.root.join(INDICES_FILE)
    }

    fn definitions_dir(&self) -> PathBuf {
        self.root.join(DEFINITIONS_DIR)
    }

    fn definition_path(
        &self,
        slot: Slot,
    ) -> PathBuf {
        self.definitions_dir().join(format!("{slot}.json"))
    }
}

impl DefinitionStorage for DiskStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Disk
    }

    fn put(
        &mut self,
        slot: Slot,
        definition: Definition,
    ) -> Result<(), StoreError> {
        let path = self.definition_path(slot);
        let json = serde_json::to_vec(&definition)?;
        std::fs::write(&path, json).map_err(|error| StoreError::io(&path, error))
    }

    fn get(
        &self,
        slot: Slot,
    ) -> Result<Arc<Definition>, StoreError> {
        let path = self.definition_path(slot);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::MissingSlot(slot)),
            Err(error) => return Err(StoreError::io(&path, error)),
        };
        Ok(Arc::new(serde_json::from_slice(&bytes)?))
    }

    fn delete(
        &mut self,
        slot: Slot,
    ) -> Result<(), StoreError> {
        let path = self.definition_path(slot);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::io(&path, error)),
        }
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let dir = self.definitions_dir();
        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|error| StoreError::io(&dir, error))?;
        }
        std::fs::create_dir_all(&dir).map_err(|error| StoreError::io(&dir, error))?;
        let indices = self.indices_path();
        if indices.exists() {
            std::fs::remove_file(&indices).map_err(|error| StoreError::io(&indices, error))?;
        }
        Ok(())
    }

    fn persist_indices(
        &mut self,
        snapshot: &IndexSnapshot<'_>,
    ) -> Result<(), StoreError> {
        let path = self.indices_path();
        let json = serde_json::to_vec(snapshot)?;
        std::fs::write(&path, json).map_err(|error| StoreError::io(&path, error))
    }
}
