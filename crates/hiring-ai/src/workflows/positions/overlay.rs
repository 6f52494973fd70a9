use std::collections::BTreeSet;

/// Removal set layered over a keyed collection.
///
/// Marked entries stay in the underlying list; readers go through [`SoftDeleteOverlay::live_view`]
/// so a delete can be undone with [`SoftDeleteOverlay::restore`] until the list is finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDeleteOverlay<K: Ord> {
    deleted: BTreeSet<K>,
}

impl<K: Ord> Default for SoftDeleteOverlay<K> {
    fn default() -> Self {
        Self {
            deleted: BTreeSet::new(),
        }
    }
}

impl<K: Ord> SoftDeleteOverlay<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn mark_deleted(&mut self, key: K) {
        self.deleted.insert(key);
    }

    /// No-op when the key was never marked.
    pub fn restore(&mut self, key: &K) {
        self.deleted.remove(key);
    }

    pub fn is_deleted(&self, key: &K) -> bool {
        self.deleted.contains(key)
    }

    pub fn live_view<'a, T, F>(&self, list: &'a [T], key_of: F) -> Vec<&'a T>
    where
        F: Fn(&T) -> &K,
    {
        list.iter()
            .filter(|item| !self.deleted.contains(key_of(item)))
            .collect()
    }

    pub fn deleted(&self) -> impl Iterator<Item = &K> {
        self.deleted.iter()
    }

    pub fn len(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
    }

    pub fn clear(&mut self) {
        self.deleted.clear();
    }
}

impl SoftDeleteOverlay<usize> {
    /// Live view for lists keyed by position rather than by an embedded id.
    pub fn live_indexed<'a, T>(&self, list: &'a [T]) -> Vec<&'a T> {
        list.iter()
            .enumerate()
            .filter(|(index, _)| !self.deleted.contains(index))
            .map(|(_, item)| item)
            .collect()
    }
}
