use std::collections::BTreeSet;

use crate::page::Page;
use crate::tape::TapeId;

/// Tape strips currently selected on the active page.
///
/// Ordered so iteration (and anything derived from it) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<TapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &TapeId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TapeId> {
        self.ids.iter()
    }

    pub fn ids(&self) -> Vec<TapeId> {
        self.ids.iter().cloned().collect()
    }

    /// Adds the id if absent, removes it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, id: TapeId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn replace(&mut self, ids: impl IntoIterator<Item = TapeId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Drops ids with no matching strip on `page`. Returns true if any were dropped.
    pub fn prune(&mut self, page: &Page) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| page.has_tape(id));
        self.ids.len() != before
    }
}
