//! Type -> id tree aggregating reset state across mods.
//!
//! Maintained incrementally next to the flat indices. Each entry counts
//! its members with a non-default reset state, and the tree counts entries
//! with a non-zero count, so "is anything reset" is a field read.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::indices::Slot;
use crate::definition::ResetType;

/// One `Type` and every id defined under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalNode {
    pub name: String,
    pub children: Vec<HierarchicalChild>,
}

/// All definitions sharing one `Type` and `Id`, across mods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalChild {
    pub id: String,
    /// Distinct mod names, in insertion order.
    pub mods: Vec<String>,
    /// First non-default reset state among the members.
    pub reset_type: ResetType,
    pub file_names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct HierarchyEntry {
    pub(crate) members: Vec<(Slot, ResetType)>,
    non_default: usize,
}

impl HierarchyEntry {
    pub(crate) fn aggregate(&self) -> ResetType {
        self.members.iter().map(|(_, reset)| *reset).find(|reset| !reset.is_default()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Hierarchy {
    types: IndexMap<String, IndexMap<String, HierarchyEntry>>,
    reset_entries: usize,
}

impl Hierarchy {
    pub(crate) fn insert(
        &mut self,
        type_key: &str,
        id: &str,
        slot: Slot,
        reset: ResetType,
    ) {
        let entry = self.types.entry(type_key.to_string()).or_default().entry(id.to_string()).or_default();
        let was_reset = entry.non_default > 0;
        entry.members.push((slot, reset));
        if !reset.is_default() {
            entry.non_default += 1;
        }
        if !was_reset && entry.non_default > 0 {
            self.reset_entries += 1;
        }
    }

    pub(crate) fn remove(
        &mut self,
        type_key: &str,
        id: &str,
        slot: Slot,
    ) -> bool {
        let Some(ids) = self.types.get_mut(type_key) else {
            return false;
        };
        let Some(entry) = ids.get_mut(id) else {
            return false;
        };
        let Some(position) = entry.members.iter().position(|(member, _)| *member == slot) else {
            return false;
        };

        let was_reset = entry.non_default > 0;
        let (_, reset) = entry.members.remove(position);
        if !reset.is_default() {
            entry.non_default -= 1;
        }
        if was_reset && entry.non_default == 0 {
            self.reset_entries -= 1;
        }
        if entry.members.is_empty() {
            ids.shift_remove(id);
            if ids.is_empty() {
                self.types.shift_remove(type_key);
            }
        }
        true
    }

    /// Updates one member's reset state and its entry's aggregate.
    pub(crate) fn set_reset(
        &mut self,
        type_key: &str,
        id: &str,
        slot: Slot,
        reset: ResetType,
    ) -> bool {
        let Some(entry) = self.types.get_mut(type_key).and_then(|ids| ids.get_mut(id)) else {
            return false;
        };
        let Some(member) = entry.members.iter_mut().find(|(member, _)| *member == slot) else {
            return false;
        };

        let was_reset = entry.non_default > 0;
        let previous = std::mem::replace(&mut member.1, reset);
        match (previous.is_default(), reset.is_default()) {
            (true, false) => entry.non_default += 1,
            (false, true) => entry.non_default -= 1,
            _ => {},
        }
        match (was_reset, entry.non_default > 0) {
            (false, true) => self.reset_entries += 1,
            (true, false) => self.reset_entries -= 1,
            _ => {},
        }
        true
    }

    pub(crate) fn has_reset(&self) -> bool {
        self.reset_entries > 0
    }

    pub(crate) fn types(&self) -> impl Iterator<Item = (&str, &IndexMap<String, HierarchyEntry>)> {
        self.types.iter().map(|(name, ids)| (name.as_str(), ids))
    }
}

#[cfg(test)]
#[path = "../../tests/src/index/hierarchy_tests.rs"]
mod tests;
