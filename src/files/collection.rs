use super::schema::{FileId, FileRecord};
use std::collections::HashSet;

/// Append the records of `next` that are not already present in `previous`.
///
/// Presence is decided by resolved id only. Records without an id are never
/// deduplicated. Duplicates inside `next` itself are kept: the seen set is
/// built from `previous` alone.
pub fn merge_by_id(
    mut previous: Vec<FileRecord>,
    next: impl IntoIterator<Item = FileRecord>,
) -> Vec<FileRecord> {
    let seen: HashSet<FileId> = previous.iter().filter_map(FileRecord::id).collect();
    previous.extend(next.into_iter().filter(|item| match item.id() {
        Some(id) => !seen.contains(&id),
        None => true,
    }));
    previous
}

/// The ordered, id-deduplicated file list shown to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileCollection {
    items: Vec<FileRecord>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[FileRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace everything with a first page.
    pub fn replace(&mut self, items: Vec<FileRecord>) {
        self.items = items;
    }

    /// Merge a later page; returns how many records were appended.
    pub fn merge_page(&mut self, items: Vec<FileRecord>) -> usize {
        let before = self.items.len();
        self.items = merge_by_id(std::mem::take(&mut self.items), items);
        self.items.len() - before
    }

    /// Resolvable ids in collection order.
    pub fn ids(&self) -> Vec<FileId> {
        self.items.iter().filter_map(FileRecord::id).collect()
    }

    pub fn get(&self, id: &FileId) -> Option<&FileRecord> {
        self.items.iter().find(|item| item.id().as_ref() == Some(id))
    }

    pub fn contains(&self, id: &FileId) -> bool {
        self.get(id).is_some()
    }

    /// Remove every record carrying `id`; returns how many were removed.
    pub fn remove(&mut self, id: &FileId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id().as_ref() != Some(id));
        before - self.items.len()
    }

    /// Remove every record whose id is in `ids`, in one pass.
    pub fn remove_many(&mut self, ids: &HashSet<FileId>) -> usize {
        let before = self.items.len();
        self.items
            .retain(|item| item.id().map_or(true, |id| !ids.contains(&id)));
        before - self.items.len()
    }
}

impl<'a> IntoIterator for &'a FileCollection {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
