//! lattice::levels
//!
//! Level assignment.
//!
//! A node's level is its depth: the root sits on level 0 and every child one
//! level below its parent. Aggregated subtrees no longer exist in the tree, so
//! they simply contribute no levels.
//!
//! Within a level, nodes are ordered by their parent's position on the level
//! above, then by id. Sibling sort keys play no part, so manual
//! reordering of siblings never invalidates a computed level map.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::tree::AssemblyTree;
use crate::core::types::NodeId;

/// Level of every node, plus the ordered membership of every level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelMap {
    levels: BTreeMap<NodeId, usize>,
    rows: Vec<Vec<NodeId>>,
}

impl LevelMap {
    /// Level of `id`, if it is in the map.
    pub fn level_of(&self, id: NodeId) -> Option<usize> {
        self.levels.get(&id).copied()
    }

    /// Nodes on `level`, in layout order.
    pub fn nodes_at(&self, level: usize) -> &[NodeId] {
        self.rows.get(level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct levels.
    pub fn level_count(&self) -> usize {
        self.rows.len()
    }

    /// Deepest level, if any.
    pub fn max_level(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    /// Rows from level 0 downward.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[NodeId])> {
        self.rows.iter().enumerate().map(|(i, r)| (i, r.as_slice()))
    }

    /// Number of nodes placed.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no nodes are placed.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Compute levels for every node reachable from the root.
pub fn recompute_levels(tree: &AssemblyTree) -> LevelMap {
    let mut levels = BTreeMap::new();
    let mut rows: Vec<Vec<NodeId>> = Vec::new();

    let mut current = vec![tree.root()];
    while !current.is_empty() {
        let depth = rows.len();
        let mut next = Vec::new();
        for id in &current {
            levels.insert(*id, depth);
            let mut children = tree.children_of(*id).to_vec();
            children.sort_unstable();
            next.extend(children);
        }
        rows.push(current);
        current = next;
    }

    LevelMap { levels, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw)
    }

    #[test]
    fn root_only() {
        let tree = AssemblyTree::new(id(1), "root");
        let map = recompute_levels(&tree);
        assert_eq!(map.level_of(id(1)), Some(0));
        assert_eq!(map.level_count(), 1);
        assert_eq!(map.max_level(), Some(0));
    }

    #[test]
    fn levels_follow_depth() {
        let mut tree = AssemblyTree::new(id(1), "root");
        let a = tree.create_node(id(1), "a").unwrap();
        let b = tree.create_node(id(1), "b").unwrap();
        let c = tree.create_node(a, "c").unwrap();
        let map = recompute_levels(&tree);
        assert_eq!(map.level_of(a), Some(1));
        assert_eq!(map.level_of(b), Some(1));
        assert_eq!(map.level_of(c), Some(2));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn row_order_groups_by_parent_then_id() {
        // root -> 2, 3; 3 -> 4, 6; 2 -> 5
        let mut tree = AssemblyTree::new(id(1), "root");
        tree.create_node(id(1), "a").unwrap();
        tree.create_node(id(1), "b").unwrap();
        tree.create_node(id(3), "c").unwrap();
        tree.create_node(id(2), "d").unwrap();
        tree.create_node(id(3), "e").unwrap();
        let map = recompute_levels(&tree);
        assert_eq!(map.nodes_at(1), &[id(2), id(3)]);
        assert_eq!(map.nodes_at(2), &[id(5), id(4), id(6)]);
    }

    #[test]
    fn sibling_reorder_does_not_change_rows() {
        let mut tree = AssemblyTree::new(id(1), "root");
        tree.create_node(id(1), "b").unwrap();
        tree.create_node(id(1), "a").unwrap();
        let before = recompute_levels(&tree);
        crate::core::sort::SortOrdering::default().sort_children(&mut tree, id(1));
        assert_eq!(tree.children_of(id(1)), &[id(3), id(2)]);
        assert_eq!(recompute_levels(&tree), before);
    }

    #[test]
    fn removed_subtree_drops_levels() {
        let mut tree = AssemblyTree::new(id(1), "root");
        let a = tree.create_node(id(1), "a").unwrap();
        tree.create_node(a, "b").unwrap();
        tree.remove_node(a).unwrap();
        let map = recompute_levels(&tree);
        assert_eq!(map.level_count(), 1);
        assert!(map.nodes_at(1).is_empty());
    }
}
