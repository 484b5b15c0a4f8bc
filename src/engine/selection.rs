//! engine::selection
//!
//! Selection and checked sets shared between the editor and its view.
//!
//! Both sets are plain data handed to every edit operation. The editor
//! treats their contents as untrusted: ids are checked against the tree on
//! each use, never assumed to still exist.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::types::NodeId;

/// Nodes selected for the next operation, in the order they were selected.
///
/// Order matters: when several selected nodes tie for minimum depth,
/// Assemble places the new assembly beside the first of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: Vec<NodeId>,
}

impl SelectionSet {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`. Returns `false` if it was already selected.
    pub fn insert(&mut self, id: NodeId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove `id`. Returns `false` if it was not selected.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| *s != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in selection order.
    pub fn as_slice(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }
}

impl FromIterator<NodeId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = NodeId>>(iter: T) -> Self {
        let mut set = SelectionSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Nodes checked for image display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckedSet {
    ids: BTreeSet<NodeId>,
}

impl CheckedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now checked.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Checked ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.ids.iter()
    }
}

/// The view-side state every operation receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub selected: SelectionSet,
    pub checked: CheckedSet,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view with `ids` selected, in order.
    pub fn with_selection<I: IntoIterator<Item = NodeId>>(ids: I) -> Self {
        Self {
            selected: ids.into_iter().collect(),
            checked: CheckedSet::new(),
        }
    }

    /// Forget every handle; used after structural changes.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.checked.clear();
    }
}
