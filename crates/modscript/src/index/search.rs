use std::collections::HashMap;

use indexmap::IndexMap;

use super::indices::Slot;
use crate::definition::Definition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    ExactId,
    IdPrefix,
    IdSubstring,
    Tag,
}

/// Case-insensitive id and tag lookup.
#[derive(Debug, Clone, Default)]
pub(crate) struct SearchIndex {
    ids: IndexMap<Slot, String>,
    tags: HashMap<String, Vec<Slot>>,
}

impl SearchIndex {
    pub(crate) fn insert(
        &mut self,
        slot: Slot,
        definition: &Definition,
    ) {
        self.ids.insert(slot, definition.id.to_lowercase());
        for tag in &definition.tags {
            let slots = self.tags.entry(tag.to_lowercase()).or_default();
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
    }

    pub(crate) fn remove(
        &mut self,
        slot: Slot,
        definition: &Definition,
    ) {
        self.ids.shift_remove(&slot);
        for tag in &definition.tags {
            let tag = tag.to_lowercase();
            if let Some(slots) = self.tags.get_mut(&tag) {
                slots.retain(|s| *s != slot);
                if slots.is_empty() {
                    self.tags.remove(&tag);
                }
            }
        }
    }

    /// Matching slots, best rank first, insertion order within a rank.
    pub(crate) fn search(
        &self,
        term: &str,
    ) -> Vec<Slot> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        let mut best: HashMap<Slot, Rank> = HashMap::new();
        for (slot, id) in &self.ids {
            let rank = if *id == term {
                Rank::ExactId
            } else if id.starts_with(&term) {
                Rank::IdPrefix
            } else if id.contains(&term) {
                Rank::IdSubstring
            } else {
                continue;
            };
            best.insert(*slot, rank);
        }
        for (tag, slots) in &self.tags {
            if !tag.contains(&term) {
                continue;
            }
            for slot in slots {
                best.entry(*slot).or_insert(Rank::Tag);
            }
        }

        let mut ranked: Vec<(Rank, Slot)> = best.into_iter().map(|(slot, rank)| (rank, slot)).collect();
        ranked.sort_unstable();
        ranked.into_iter().map(|(_, slot)| slot).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/src/index/search_tests.rs"]
mod tests;
