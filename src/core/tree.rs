//! core::tree
//!
//! The assembly tree: a single rooted hierarchy of parts and assemblies.
//!
//! # Architecture
//!
//! Nodes live in an id-keyed map. Each node stores its parent pointer and an
//! ordered child list; the two are kept in lockstep by every mutation.
//!
//! # Invariants
//!
//! - Exactly one root, which has no parent and can never be moved or removed
//! - Every other node has exactly one parent, and appears exactly once in
//!   that parent's child list
//! - No cycles
//! - Identifiers are unique and never reused (see [`super::ids`])
//!
//! Every mutation is atomic: it either fully succeeds or leaves the tree
//! untouched.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::Serialize;
use thiserror::Error;

use super::ids::IdAllocator;
use super::types::{NodeId, NodeKind};

/// Errors from tree mutations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} cannot be used as a parent")]
    InvalidParent(NodeId),

    #[error("node {0} is the root and cannot be moved or removed")]
    RootViolation(NodeId),

    #[error("cannot move node {node} under {target}: target is inside the moved subtree")]
    DescendantViolation { node: NodeId, target: NodeId },

    #[error("node id {0} is already in use")]
    DuplicateId(NodeId),

    #[error("node identifiers exhausted")]
    IdsExhausted,
}

/// One part or assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: NodeId,
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    sort_key: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    history: Vec<NodeId>,
}

impl Node {
    fn new(id: NodeId, tag: String, parent: Option<NodeId>) -> Self {
        Self {
            id,
            tag,
            parent,
            children: Vec::new(),
            sort_key: id.get(),
            history: Vec::new(),
        }
    }

    /// The node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display label.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in current display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Leaf iff childless.
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_child_count(self.children.len())
    }

    /// Numeric sort key. Defaults to the id; manual reordering changes it.
    pub fn sort_key(&self) -> u64 {
        self.sort_key
    }

    /// Ids of children collapsed into this node by an aggregate.
    pub fn history(&self) -> &[NodeId] {
        &self.history
    }
}

/// A rooted tree of [`Node`]s.
///
/// # Example
///
/// ```
/// use assembly_lattice::core::tree::AssemblyTree;
/// use assembly_lattice::core::types::{NodeId, NodeKind};
///
/// let mut tree = AssemblyTree::new(NodeId::new(1), "bike");
/// let frame = tree.create_node(tree.root(), "frame").unwrap();
/// let wheel = tree.create_node(tree.root(), "wheel").unwrap();
///
/// assert_eq!(frame, NodeId::new(2));
/// assert_eq!(tree.children_of(tree.root()), &[frame, wheel]);
/// assert_eq!(tree.kind(frame), Some(NodeKind::Leaf));
/// assert_eq!(tree.depth(wheel), Some(1));
///
/// tree.move_node(wheel, frame).unwrap();
/// assert_eq!(tree.parent_of(wheel), Some(frame));
/// assert_eq!(tree.kind(frame), Some(NodeKind::Assembly));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyTree {
    root: NodeId,
    nodes: BTreeMap<NodeId, Node>,
    #[serde(skip)]
    ids: IdAllocator,
}

impl AssemblyTree {
    /// Create a tree holding only a root node.
    pub fn new(root: NodeId, tag: impl Into<String>) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(root, Node::new(root, tag.into(), None));
        let mut ids = IdAllocator::default();
        ids.observe(root);
        Self { root, nodes, ids }
    }

    /// The root's identifier.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` is in the tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Kind of a node, if it exists.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    /// Tag of a node, if it exists.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Node::tag)
    }

    /// The identifier the next created node will receive.
    ///
    /// Strictly greater than every identifier ever present in this tree.
    pub fn peek_next_id(&self) -> Option<NodeId> {
        self.ids.clone().allocate()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a node with a fresh identifier, appended to `parent`'s children.
    ///
    /// # Errors
    ///
    /// `InvalidParent` if `parent` does not exist.
    pub fn create_node(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::InvalidParent(parent));
        }
        let id = self.ids.allocate().ok_or(TreeError::IdsExhausted)?;
        self.attach_new(parent, id, tag.into());
        Ok(id)
    }

    /// Insert a node with a caller-chosen identifier.
    ///
    /// Used when seeding a tree from imported data, whose identifiers must
    /// be preserved.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if `id` is in use; `InvalidParent` if `parent` does not
    /// exist.
    pub fn insert_node(
        &mut self,
        parent: NodeId,
        id: NodeId,
        tag: impl Into<String>,
    ) -> Result<(), TreeError> {
        if self.contains(id) {
            return Err(TreeError::DuplicateId(id));
        }
        if !self.contains(parent) {
            return Err(TreeError::InvalidParent(parent));
        }
        self.ids.observe(id);
        self.attach_new(parent, id, tag.into());
        Ok(())
    }

    fn attach_new(&mut self, parent: NodeId, id: NodeId, tag: String) {
        self.nodes.insert(id, Node::new(id, tag, Some(parent)));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
    }

    /// Move `id` (with its subtree) to the end of `new_parent`'s children.
    ///
    /// # Errors
    ///
    /// - `RootViolation` if `id` is the root
    /// - `UnknownNode` if `id` does not exist
    /// - `InvalidParent` if `new_parent` does not exist
    /// - `DescendantViolation` if `new_parent` is `id` or lies beneath it
    pub fn move_node(&mut self, id: NodeId, new_parent: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootViolation(id));
        }
        let old_parent = self
            .get(id)
            .ok_or(TreeError::UnknownNode(id))?
            .parent
            .ok_or(TreeError::RootViolation(id))?;
        if !self.contains(new_parent) {
            return Err(TreeError::InvalidParent(new_parent));
        }
        if new_parent == id || self.is_descendant_of(new_parent, id) {
            return Err(TreeError::DescendantViolation {
                node: id,
                target: new_parent,
            });
        }

        if let Some(p) = self.nodes.get_mut(&old_parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(id);
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.parent = Some(new_parent);
        }
        Ok(())
    }

    /// Remove `id` and its entire subtree.
    ///
    /// Removing an id that is not in the tree is a successful no-op, so a
    /// batch may name nodes whose ancestor was already removed earlier in
    /// the same batch. Returns the removed ids, `id` first.
    ///
    /// # Errors
    ///
    /// `RootViolation` if `id` is the root.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        if id == self.root {
            return Err(TreeError::RootViolation(id));
        }
        let Some(parent) = self.get(id).and_then(Node::parent) else {
            return Ok(Vec::new());
        };

        let mut removed = vec![id];
        removed.extend(self.all_descendants(id));

        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        for gone in &removed {
            self.nodes.remove(gone);
        }
        Ok(removed)
    }

    /// Rename a node. No structural effect.
    pub fn update_tag(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))?;
        node.tag = text.into();
        Ok(())
    }

    /// Set a node's numeric sort key without touching its identity.
    pub fn set_sort_key(&mut self, id: NodeId, key: u64) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))?;
        node.sort_key = key;
        Ok(())
    }

    /// Replace a node's retained aggregate history.
    pub fn set_history(&mut self, id: NodeId, history: Vec<NodeId>) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))?;
        node.history = history;
        Ok(())
    }

    /// Mutable access to a child list, for reordering in place.
    ///
    /// Callers must only permute the list.
    pub(crate) fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        self.nodes.get_mut(&id).map(|n| &mut n.children)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        self.contains(id).then(|| self.ancestors(id).len())
    }

    /// Parent of `id`; `None` for the root or an unknown id.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Children of `id` in display order; empty for an unknown id.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    /// All descendants of `id` (children, grandchildren, ...), breadth-first.
    pub fn all_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue: VecDeque<NodeId> = self.children_of(id).iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            result.push(current);
            queue.extend(self.children_of(current).iter().copied());
        }
        result
    }

    /// Ancestors of `id`, from immediate parent to root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if !seen.insert(parent) {
                break;
            }
            result.push(parent);
            current = self.parent_of(parent);
        }
        result
    }

    /// Whether `id` lies strictly beneath `ancestor`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }
}
