use crate::files::{FileCollection, FileId};
use std::collections::HashSet;

/// Multi-select state for bulk operations.
///
/// Entering selection mode selects every identified record in the collection;
/// the user deselects from there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: bool,
    ids: HashSet<FileId>,
}

impl Selection {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ids(&self) -> &HashSet<FileId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.ids.contains(id)
    }

    pub fn enter(&mut self, files: &FileCollection) {
        self.active = true;
        self.ids = files.ids().into_iter().collect();
    }

    pub fn exit(&mut self) {
        self.active = false;
        self.ids.clear();
    }

    /// Flip membership of `id`. Ignored outside selection mode.
    pub fn toggle(&mut self, id: &FileId) -> bool {
        if !self.active {
            return false;
        }
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
        true
    }

    pub fn remove(&mut self, id: &FileId) {
        self.ids.remove(id);
    }

    /// Select everything in a freshly replaced collection. Ignored outside
    /// selection mode.
    pub fn reseed(&mut self, files: &FileCollection) {
        if self.active {
            self.ids = files.ids().into_iter().collect();
        }
    }

    /// Selected ids in collection order. Ids no longer loaded are left out.
    pub fn ordered_ids(&self, files: &FileCollection) -> Vec<FileId> {
        files
            .ids()
            .into_iter()
            .filter(|id| self.ids.contains(id))
            .collect()
    }
}
