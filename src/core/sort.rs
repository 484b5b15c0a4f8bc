//! core::sort
//!
//! Sibling ordering.
//!
//! Two independent keys are kept per node: the display tag (compared
//! lexically) and a numeric sort key that starts out equal to the node id but
//! can be reassigned to record a manual drag position. A mode flag selects the
//! key; a direction flag reverses the comparison.
//!
//! Sorting is stable: siblings with equal keys keep their prior relative
//! order, in both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::tree::{AssemblyTree, Node};
use super::types::NodeId;

/// Which key orders siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Compare display tags lexically.
    #[default]
    Alphabetical,
    /// Compare numeric sort keys.
    Identity,
}

impl SortMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            SortMode::Alphabetical => SortMode::Identity,
            SortMode::Identity => SortMode::Alphabetical,
        }
    }

    /// Config/CLI spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Alphabetical => "alphabetical",
            SortMode::Identity => "identity",
        }
    }
}

/// Ascending or descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Config/CLI spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// The active sibling-ordering policy.
///
/// # Example
///
/// ```
/// use assembly_lattice::core::sort::{SortDirection, SortMode, SortOrdering};
/// use assembly_lattice::core::tree::AssemblyTree;
/// use assembly_lattice::core::types::NodeId;
///
/// let mut tree = AssemblyTree::new(NodeId::new(1), "root");
/// let root = tree.root();
/// let b = tree.create_node(root, "b").unwrap();
/// let a = tree.create_node(root, "a").unwrap();
///
/// let ordering = SortOrdering::new(SortMode::Alphabetical, SortDirection::Ascending);
/// ordering.sort_children(&mut tree, root);
/// assert_eq!(tree.children_of(root), &[a, b]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortOrdering {
    pub mode: SortMode,
    pub direction: SortDirection,
}

impl SortOrdering {
    /// Create an ordering policy.
    pub fn new(mode: SortMode, direction: SortDirection) -> Self {
        Self { mode, direction }
    }

    /// Flip between alphabetical and identity ordering.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Flip between ascending and descending.
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
    }

    /// Compare two nodes under the active key and direction.
    pub fn compare(&self, a: &Node, b: &Node) -> Ordering {
        let ord = match self.mode {
            SortMode::Alphabetical => a.tag().cmp(b.tag()),
            SortMode::Identity => a.sort_key().cmp(&b.sort_key()),
        };
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    /// Reorder `node`'s children in place. Stable.
    ///
    /// Unknown nodes and nodes with fewer than two children are left as is.
    pub fn sort_children(&self, tree: &mut AssemblyTree, node: NodeId) {
        if tree.children_of(node).len() < 2 {
            return;
        }
        let mut keyed: Vec<Node> = tree
            .children_of(node)
            .iter()
            .filter_map(|c| tree.get(*c).cloned())
            .collect();
        // slice::sort_by is stable
        keyed.sort_by(|a, b| self.compare(a, b));
        if let Some(children) = tree.children_mut(node) {
            *children = keyed.into_iter().map(|n| n.id()).collect();
        }
    }

    /// Apply [`Self::sort_children`] to every node in the subtree rooted at
    /// `node` that has more than one child.
    pub fn sort_subtree(&self, tree: &mut AssemblyTree, node: NodeId) {
        let mut targets = vec![node];
        targets.extend(tree.all_descendants(node));
        for target in targets {
            if tree.children_of(target).len() > 1 {
                self.sort_children(tree, target);
            }
        }
    }
}

/// Renumber the children of `parent` from 1 so that `dragged` takes the slot
/// currently held by `drop_target`, everything else keeping its order.
///
/// Only numeric sort keys change; ids are untouched. Returns `false` (and
/// changes nothing) unless both nodes are children of `parent`.
pub fn renumber_for_drop(
    tree: &mut AssemblyTree,
    parent: NodeId,
    dragged: NodeId,
    drop_target: NodeId,
) -> bool {
    let siblings = tree.children_of(parent).to_vec();
    if !siblings.contains(&dragged) || !siblings.contains(&drop_target) {
        return false;
    }

    let mut next_key = 1u64;
    let mut assignments = Vec::with_capacity(siblings.len());
    for child in siblings {
        if child == drop_target {
            assignments.push((dragged, next_key));
            next_key += 1;
            if drop_target == dragged {
                continue;
            }
        } else if child == dragged {
            continue;
        }
        assignments.push((child, next_key));
        next_key += 1;
    }

    for (child, key) in assignments {
        // Both ids were just read from the tree.
        let _ = tree.set_sort_key(child, key);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw)
    }

    fn tree_with(tags: &[&str]) -> AssemblyTree {
        let mut tree = AssemblyTree::new(id(1), "root");
        for tag in tags {
            tree.create_node(id(1), *tag).unwrap();
        }
        tree
    }

    #[test]
    fn alphabetical_ascending() {
        let mut tree = tree_with(&["wheel", "frame", "seat"]);
        SortOrdering::default().sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(3), id(4), id(2)]);
    }

    #[test]
    fn alphabetical_is_stable_for_equal_tags() {
        let mut tree = tree_with(&["bolt", "axle", "bolt", "bolt"]);
        SortOrdering::default().sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(3), id(2), id(4), id(5)]);

        let desc = SortOrdering::new(SortMode::Alphabetical, SortDirection::Descending);
        desc.sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(2), id(4), id(5), id(3)]);
    }

    #[test]
    fn identity_uses_sort_key_not_id() {
        let mut tree = tree_with(&["a", "b", "c"]);
        tree.set_sort_key(id(2), 30).unwrap();
        let ordering = SortOrdering::new(SortMode::Identity, SortDirection::Ascending);
        ordering.sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(3), id(4), id(2)]);
    }

    #[test]
    fn direction_reverses_distinct_keys() {
        let mut tree = tree_with(&["c", "a", "b"]);
        let mut ordering = SortOrdering::default();
        ordering.sort_children(&mut tree, id(1));
        let asc = tree.children_of(id(1)).to_vec();
        ordering.toggle_direction();
        ordering.sort_children(&mut tree, id(1));
        let mut desc = tree.children_of(id(1)).to_vec();
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn sort_subtree_reaches_every_level() {
        let mut tree = tree_with(&["z", "y"]);
        tree.create_node(id(2), "q").unwrap();
        tree.create_node(id(2), "p").unwrap();
        SortOrdering::default().sort_subtree(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(3), id(2)]);
        assert_eq!(tree.children_of(id(2)), &[id(5), id(4)]);
    }

    #[test]
    fn toggles_flip() {
        let mut ordering = SortOrdering::default();
        ordering.toggle_mode();
        assert_eq!(ordering.mode, SortMode::Identity);
        ordering.toggle_mode();
        assert_eq!(ordering.mode, SortMode::Alphabetical);
    }

    #[test]
    fn renumber_moves_dragged_into_drop_slot() {
        // children 2,3,4,5; drag 5 onto 3 -> 2,5,3,4
        let mut tree = tree_with(&["a", "b", "c", "d"]);
        assert!(renumber_for_drop(&mut tree, id(1), id(5), id(3)));
        let ordering = SortOrdering::new(SortMode::Identity, SortDirection::Ascending);
        ordering.sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(2), id(5), id(3), id(4)]);
        assert_eq!(tree.get(id(5)).unwrap().sort_key(), 2);
        assert_eq!(tree.get(id(4)).unwrap().sort_key(), 4);
    }

    #[test]
    fn renumber_dragging_forward() {
        // children 2,3,4,5; drag 2 onto 4 -> 3,2,4,5
        let mut tree = tree_with(&["a", "b", "c", "d"]);
        assert!(renumber_for_drop(&mut tree, id(1), id(2), id(4)));
        let ordering = SortOrdering::new(SortMode::Identity, SortDirection::Ascending);
        ordering.sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(3), id(2), id(4), id(5)]);
    }

    #[test]
    fn renumber_rejects_non_siblings() {
        let mut tree = tree_with(&["a", "b"]);
        tree.create_node(id(2), "c").unwrap();
        assert!(!renumber_for_drop(&mut tree, id(1), id(4), id(3)));
        assert_eq!(tree.get(id(3)).unwrap().sort_key(), 3);
    }
}
