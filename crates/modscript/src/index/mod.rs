//! Indexed definition store.
//!
//! Definitions live in one storage backend (memory or disk) addressed by
//! slot; flat lookup tables, the optional reset hierarchy and the optional
//! search index only hold slots.

mod hierarchy;
mod indices;
mod search;
mod storage;
mod store;

use std::path::{Path, PathBuf};

pub use hierarchy::{HierarchicalChild, HierarchicalNode};
pub use indices::{KeyIndex, SecondaryIndices, Slot};
pub use storage::{DefinitionStorage, DiskStorage, IndexSnapshot, MemoryStorage, StorageKind};
pub use store::{IndexedDefinitions, IndexedDefinitionsBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage cannot be switched after definitions were loaded")]
    AlreadyLoaded,

    #[error("store used before init")]
    NotInitialized,

    #[error("store was loaded without hierarchy support")]
    HierarchyDisabled,

    #[error("search index is not enabled")]
    SearchDisabled,

    #[error("no definition stored in slot {0}")]
    MissingSlot(Slot),

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("definition payload error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(
        path: &Path,
        error: std::io::Error,
    ) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            error,
        }
    }
}
