use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::definition::Definition;

/// Position of a definition in the store. Slots grow with insertion, so
/// ordering by slot is insertion order.
pub type Slot = u64;

/// Key -> slots, keys in first-seen order, slots ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyIndex {
    entries: IndexMap<String, Vec<Slot>>,
}

impl KeyIndex {
    pub fn insert(
        &mut self,
        key: &str,
        slot: Slot,
    ) {
        let slots = self.entries.entry(key.to_string()).or_default();
        if let Err(position) = slots.binary_search(&slot) {
            slots.insert(position, slot);
        }
    }

    /// Detaches `slot`; a key left without slots is dropped.
    pub fn remove(
        &mut self,
        key: &str,
        slot: Slot,
    ) {
        let Some(slots) = self.entries.get_mut(key) else {
            return;
        };
        if let Ok(position) = slots.binary_search(&slot) {
            slots.remove(position);
        }
        if slots.is_empty() {
            self.entries.shift_remove(key);
        }
    }

    pub fn get(
        &self,
        key: &str,
    ) -> &[Slot] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flat lookup tables over every stored definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndices {
    pub by_file: KeyIndex,
    pub by_disk_file: KeyIndex,
    pub by_value_type: KeyIndex,
    pub by_type: KeyIndex,
    pub by_type_and_id: KeyIndex,
    pub by_directory: KeyIndex,
    pub by_id: KeyIndex,
}

impl SecondaryIndices {
    pub fn insert(
        &mut self,
        slot: Slot,
        definition: &Definition,
    ) {
        self.by_file.insert(&definition.file, slot);
        if let Some(disk_file) = &definition.disk_file {
            self.by_disk_file.insert(disk_file, slot);
        }
        self.by_value_type.insert(definition.value_type.as_str(), slot);
        self.by_type.insert(&definition.type_key, slot);
        self.by_type_and_id.insert(&definition.type_and_id(), slot);
        self.by_directory.insert(definition.parent_directory(), slot);
        self.by_id.insert(&definition.id, slot);
    }

    pub fn remove(
        &mut self,
        slot: Slot,
        definition: &Definition,
    ) {
        self.by_file.remove(&definition.file, slot);
        if let Some(disk_file) = &definition.disk_file {
            self.by_disk_file.remove(disk_file, slot);
        }
        self.by_value_type.remove(definition.value_type.as_str(), slot);
        self.by_type.remove(&definition.type_key, slot);
        self.by_type_and_id.remove(&definition.type_and_id(), slot);
        self.by_directory.remove(definition.parent_directory(), slot);
        self.by_id.remove(&definition.id, slot);
    }
}

#[cfg(test)]
#[path = "../../tests/src/index/indices_tests.rs"]
mod tests;
