use std::{
    collections::{BTreeSet, HashMap},
    path::PathBuf,
    sync::Arc,
};

use tracing::{debug, info, warn};

use super::{
    StoreError,
    hierarchy::{HierarchicalChild, HierarchicalNode, Hierarchy},
    indices::{SecondaryIndices, Slot},
    search::SearchIndex,
    storage::{DefinitionStorage, DiskStorage, IndexSnapshot, MemoryStorage, StorageKind},
};
use crate::{
    config::{DEFAULT_SEARCH_LIMIT, StoreSettings},
    definition::{Definition, DefinitionKey, ResetType, ValueType, type_and_id},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreState {
    Uninitialized,
    Loaded,
}

/// Everything derived from the stored definitions. Rebuilt from scratch by
/// `init` and swapped in whole.
#[derive(Debug, Default)]
struct Indexes {
    next_slot: Slot,
    keys: HashMap<DefinitionKey, Slot>,
    slots: BTreeSet<Slot>,
    secondary: SecondaryIndices,
    hierarchy: Option<Hierarchy>,
    search: Option<SearchIndex>,
    game_definitions: usize,
}

impl Indexes {
    fn new(
        build_hierarchy: bool,
        enable_search: bool,
    ) -> Self {
        Self {
            hierarchy: build_hierarchy.then(Hierarchy::default),
            search: enable_search.then(SearchIndex::default),
            ..Self::default()
        }
    }

    fn attach(
        &mut self,
        slot: Slot,
        definition: &Definition,
    ) {
        self.secondary.insert(slot, definition);
        if let Some(hierarchy) = &mut self.hierarchy {
            hierarchy.insert(&definition.type_key, &definition.id, slot, definition.reset_type);
        }
        if let Some(search) = &mut self.search {
            search.insert(slot, definition);
        }
        if definition.is_from_game {
            self.game_definitions += 1;
        }
    }

    fn detach(
        &mut self,
        slot: Slot,
        definition: &Definition,
    ) {
        self.secondary.remove(slot, definition);
        if let Some(hierarchy) = &mut self.hierarchy {
            hierarchy.remove(&definition.type_key, &definition.id, slot);
        }
        if let Some(search) = &mut self.search {
            search.remove(slot, definition);
        }
        if definition.is_from_game {
            self.game_definitions -= 1;
        }
    }

    /// Adds `definition`, or replaces the stored one with the same identity
    /// in its existing slot.
    fn upsert(
        &mut self,
        storage: &mut dyn DefinitionStorage,
        definition: Definition,
    ) -> Result<Slot, StoreError> {
        let key = definition.key();
        if let Some(&slot) = self.keys.get(&key) {
            let previous = storage.get(slot)?;
            storage.put(slot, definition.clone())?;
            self.detach(slot, &previous);
            self.attach(slot, &definition);
            return Ok(slot);
        }

        let slot = self.next_slot;
        storage.put(slot, definition.clone())?;
        self.next_slot += 1;
        self.attach(slot, &definition);
        self.keys.insert(key, slot);
        self.slots.insert(slot);
        Ok(slot)
    }

    fn remove(
        &mut self,
        storage: &mut dyn DefinitionStorage,
        key: &DefinitionKey,
    ) -> Result<bool, StoreError> {
        let Some(&slot) = self.keys.get(key) else {
            return Ok(false);
        };
        let stored = storage.get(slot)?;
        storage.delete(slot)?;
        self.detach(slot, &stored);
        self.keys.remove(key);
        self.slots.remove(&slot);
        Ok(true)
    }
}

/// Multi-key store of definitions with optional reset hierarchy, search
/// and disk backing.
///
/// The store starts uninitialized. [`IndexedDefinitions::init`] loads a
/// batch and makes the store usable; until then mutations fail with
/// [`StoreError::NotInitialized`]. The storage backend may only be
/// switched before the first `init`.
///
/// Queries return definitions in insertion order. Replacing a definition
/// keeps its position.
#[derive(Debug)]
pub struct IndexedDefinitions {
    storage: Box<dyn DefinitionStorage>,
    state: StoreState,
    enable_search: bool,
    search_limit: usize,
    indexes: Indexes,
    /// Lookup tables changed since they were last handed to storage.
    indices_dirty: bool,
}

impl Default for IndexedDefinitions {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedDefinitions {
    /// In-memory store without search.
    pub fn new() -> Self {
        Self::with_storage(Box::new(MemoryStorage::default()), false, DEFAULT_SEARCH_LIMIT)
    }

    pub fn builder() -> IndexedDefinitionsBuilder {
        IndexedDefinitionsBuilder::default()
    }

    fn with_storage(
        storage: Box<dyn DefinitionStorage>,
        enable_search: bool,
        search_limit: usize,
    ) -> Self {
        Self {
            storage,
            state: StoreState::Uninitialized,
            enable_search,
            search_limit,
            indexes: Indexes::default(),
            indices_dirty: false,
        }
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    pub fn is_loaded(&self) -> bool {
        self.state == StoreState::Loaded
    }

    /// Moves definition storage to `dir`. Only legal before the first load.
    pub fn use_disk_storage(
        &mut self,
        dir: impl Into<PathBuf>,
    ) -> Result<(), StoreError> {
        if self.is_loaded() {
            return Err(StoreError::AlreadyLoaded);
        }
        self.storage = Box::new(DiskStorage::open(dir)?);
        Ok(())
    }

    /// Replaces all content with `definitions`. Later definitions with an
    /// identity already seen in the batch replace the earlier ones.
    pub fn init<I>(
        &mut self,
        definitions: I,
        build_hierarchy: bool,
    ) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = Definition>,
    {
        let mut indexes = Indexes::new(build_hierarchy, self.enable_search);
        let loaded = self.storage.clear().and_then(|()| {
            for definition in definitions {
                indexes.upsert(self.storage.as_mut(), definition)?;
            }
            Ok(())
        });

        if let Err(error) = loaded {
            self.state = StoreState::Uninitialized;
            self.indexes = Indexes::default();
            if let Err(cleanup) = self.storage.clear() {
                warn!("[store] failed to clear storage after a failed load: {cleanup}");
            }
            return Err(error);
        }

        self.indexes = indexes;
        self.state = StoreState::Loaded;
        self.persist()?;
        info!(
            "[store] loaded {} definition(s) into {} storage (hierarchy: {}, search: {})",
            self.len(),
            self.storage.kind(),
            build_hierarchy,
            self.enable_search
        );
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), StoreError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let snapshot = IndexSnapshot::new(self.indexes.next_slot, self.indexes.slots.len(), &self.indexes.secondary);
        self.storage.persist_indices(&snapshot)?;
        self.indices_dirty = false;
        Ok(())
    }

    /// Hands the lookup tables to storage if single-definition mutations
    /// changed them since the last `init`, `update` or `flush`.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.indices_dirty {
            return Ok(());
        }
        self.persist()
    }

    pub fn add(
        &mut self,
        definition: Definition,
    ) -> Result<(), StoreError> {
        self.ensure_loaded()?;
        let slot = self.indexes.upsert(self.storage.as_mut(), definition)?;
        debug!("[store] stored slot {slot}");
        self.indices_dirty = true;
        Ok(())
    }

    /// Removes the definition with the same identity as `definition`.
    /// Returns whether one was stored.
    pub fn remove(
        &mut self,
        definition: &Definition,
    ) -> Result<bool, StoreError> {
        self.ensure_loaded()?;
        let removed = self.indexes.remove(self.storage.as_mut(), &definition.key())?;
        self.indices_dirty |= removed;
        Ok(removed)
    }

    /// Replaces each definition in place by identity; unknown ones are
    /// added. Returns `false` for an empty batch.
    pub fn update(
        &mut self,
        definitions: &[Definition],
    ) -> Result<bool, StoreError> {
        if definitions.is_empty() {
            return Ok(false);
        }
        self.ensure_loaded()?;
        for definition in definitions {
            self.indexes.upsert(self.storage.as_mut(), definition.clone())?;
        }
        self.persist()?;
        Ok(true)
    }

    fn resolve(
        &self,
        slots: &[Slot],
    ) -> Vec<Arc<Definition>> {
        slots
            .iter()
            .filter_map(|slot| match self.storage.get(*slot) {
                Ok(definition) => Some(definition),
                Err(error) => {
                    warn!("[store] failed to read slot {slot}: {error}");
                    None
                },
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.indexes.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.slots.is_empty()
    }

    pub fn all_definitions(&self) -> Vec<Arc<Definition>> {
        let slots: Vec<Slot> = self.indexes.slots.iter().copied().collect();
        self.resolve(&slots)
    }

    pub fn get_by_file(
        &self,
        file: &str,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_file.get(file))
    }

    pub fn get_by_disk_file(
        &self,
        disk_file: &str,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_disk_file.get(disk_file))
    }

    pub fn get_by_value_type(
        &self,
        value_type: ValueType,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_value_type.get(value_type.as_str()))
    }

    pub fn get_by_type(
        &self,
        type_key: &str,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_type.get(type_key))
    }

    pub fn get_by_type_and_id(
        &self,
        type_key: &str,
        id: &str,
    ) -> Vec<Arc<Definition>> {
        self.get_by_type_and_id_key(&type_and_id(type_key, id))
    }

    /// Lookup by a pre-joined `TypeAndId` key.
    pub fn get_by_type_and_id_key(
        &self,
        key: &str,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_type_and_id.get(key))
    }

    /// Definitions whose file sits directly in `directory`.
    pub fn get_by_parent_directory(
        &self,
        directory: &str,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_directory.get(directory))
    }

    pub fn get_by_id(
        &self,
        id: &str,
    ) -> Vec<Arc<Definition>> {
        self.resolve(self.indexes.secondary.by_id.get(id))
    }

    pub fn get_all_file_keys(&self) -> Vec<String> {
        self.indexes.secondary.by_file.keys().map(str::to_string).collect()
    }

    pub fn get_all_directory_keys(&self) -> Vec<String> {
        self.indexes.secondary.by_directory.keys().map(str::to_string).collect()
    }

    pub fn get_all_type_keys(&self) -> Vec<String> {
        self.indexes.secondary.by_type.keys().map(str::to_string).collect()
    }

    pub fn get_all_type_and_id_keys(&self) -> Vec<String> {
        self.indexes.secondary.by_type_and_id.keys().map(str::to_string).collect()
    }

    pub fn has_game_definitions(&self) -> bool {
        self.indexes.game_definitions > 0
    }

    fn hierarchy(&self) -> Result<&Hierarchy, StoreError> {
        self.ensure_loaded()?;
        self.indexes.hierarchy.as_ref().ok_or(StoreError::HierarchyDisabled)
    }

    /// Whether any type/id entry has a member with a non-default reset state.
    pub fn has_reset_definitions(&self) -> Result<bool, StoreError> {
        Ok(self.hierarchy()?.has_reset())
    }

    pub fn get_hierarchical_definitions(&self) -> Result<Vec<HierarchicalNode>, StoreError> {
        let hierarchy = self.hierarchy()?;
        let mut nodes = Vec::new();
        for (name, ids) in hierarchy.types() {
            let children = ids
                .iter()
                .map(|(id, entry)| {
                    let slots: Vec<Slot> = entry.members.iter().map(|(slot, _)| *slot).collect();
                    let mut mods: Vec<String> = Vec::new();
                    let mut file_names: Vec<String> = Vec::new();
                    for definition in self.resolve(&slots) {
                        if !mods.contains(&definition.mod_name) {
                            mods.push(definition.mod_name.clone());
                        }
                        if !file_names.contains(&definition.file) {
                            file_names.push(definition.file.clone());
                        }
                    }
                    HierarchicalChild {
                        id: id.clone(),
                        mods,
                        reset_type: entry.aggregate(),
                        file_names,
                    }
                })
                .collect();
            nodes.push(HierarchicalNode {
                name: name.to_string(),
                children,
            });
        }
        Ok(nodes)
    }

    /// Sets the reset state of the stored definition with `definition`'s
    /// identity. Returns `false` when the store has no hierarchy or the
    /// definition is unknown.
    pub fn change_hierarchical_reset_state(
        &mut self,
        definition: &Definition,
        reset_type: ResetType,
    ) -> bool {
        if self.indexes.hierarchy.is_none() {
            return false;
        }
        let Some(&slot) = self.indexes.keys.get(&definition.key()) else {
            return false;
        };
        let stored = match self.storage.get(slot) {
            Ok(stored) => stored,
            Err(error) => {
                warn!("[store] failed to read slot {slot}: {error}");
                return false;
            },
        };

        let updated = (*stored).clone().with_reset_type(reset_type);
        if let Err(error) = self.storage.put(slot, updated) {
            warn!("[store] failed to write slot {slot}: {error}");
            return false;
        }
        let changed = self
            .indexes
            .hierarchy
            .as_mut()
            .is_some_and(|hierarchy| hierarchy.set_reset(&stored.type_key, &stored.id, slot, reset_type));
        self.indices_dirty = true;
        changed
    }

    /// Ranked `"<id> - <file>"` matches for `term`, at most `search_limit`.
    pub fn search(
        &self,
        term: &str,
    ) -> Result<Vec<String>, StoreError> {
        self.ensure_loaded()?;
        if !self.enable_search {
            return Err(StoreError::SearchDisabled);
        }
        let Some(search) = &self.indexes.search else {
            return Ok(Vec::new());
        };
        let slots: Vec<Slot> = search.search(term).into_iter().take(self.search_limit).collect();
        Ok(self.resolve(&slots).iter().map(|d| format!("{} - {}", d.id, d.file)).collect())
    }
}

impl Drop for IndexedDefinitions {
    fn drop(&mut self) {
        if let Err(error) = self.flush() {
            warn!("[store] failed to persist indices on drop: {error}");
        }
    }
}

/// Chooses the storage backend and optional capabilities before the store
/// exists, so queries never branch on them.
#[derive(Debug, Clone)]
pub struct IndexedDefinitionsBuilder {
    disk_path: Option<PathBuf>,
    enable_search: bool,
    search_limit: usize,
}

impl Default for IndexedDefinitionsBuilder {
    fn default() -> Self {
        Self {
            disk_path: None,
            enable_search: false,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl IndexedDefinitionsBuilder {
    pub fn from_settings(settings: &StoreSettings) -> Self {
        Self {
            disk_path: settings.disk_path.clone(),
            enable_search: settings.enable_search,
            search_limit: settings.search_limit,
        }
    }

    pub fn disk_storage(
        mut self,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.disk_path = Some(dir.into());
        self
    }

    pub fn enable_search(
        mut self,
        enable: bool,
    ) -> Self {
        self.enable_search = enable;
        self
    }

    pub fn search_limit(
        mut self,
        limit: usize,
    ) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    pub fn build(self) -> Result<IndexedDefinitions, StoreError> {
        let storage: Box<dyn DefinitionStorage> = match self.disk_path {
            Some(path) => Box::new(DiskStorage::open(path)?),
            None => Box::new(MemoryStorage::default()),
        };
        Ok(IndexedDefinitions::with_storage(storage, self.enable_search, self.search_limit))
    }
}

#[cfg(test)]
#[path = "../../tests/src/index/store_tests.rs"]
mod tests;
