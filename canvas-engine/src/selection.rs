//! Current selection.
//!
//! The selection only references elements by id and never keeps one alive:
//! deleting an element prunes it from the selection at delete time, so the
//! set is always a subset of the ids in the element store.

use std::collections::BTreeSet;

use crate::id::ElementId;

/// Set of selected element ids, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ElementId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the element is selected.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of selected elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.ids.iter().copied()
    }

    /// Selected ids as an owned list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ElementId> {
        self.iter().collect()
    }

    pub(crate) fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.ids = ids.into_iter().collect();
    }

    pub(crate) fn insert(&mut self, id: ElementId) {
        self.ids.insert(id);
    }

    pub(crate) fn remove(&mut self, id: ElementId) {
        self.ids.remove(&id);
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }
}
