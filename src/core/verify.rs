//! core::verify
//!
//! Fast verification of assembly tree invariants.
//!
//! # Checks
//!
//! - Root has no parent
//! - Every non-root node has a parent that exists and lists it exactly once
//! - Every child entry points back at its parent
//! - Every node is reachable from the root (no cycles, no orphans)
//!
//! # Invariants
//!
//! - Never mutates the tree
//! - Must be deterministic
//!
//! A failure here is a programming defect in a mutation, never a user error.

use std::collections::HashSet;

use super::tree::AssemblyTree;
use super::types::NodeId;
use thiserror::Error;

/// Errors from verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("root {0} has a parent")]
    RootHasParent(NodeId),

    #[error("node {0} has no parent")]
    MissingParent(NodeId),

    #[error("node {child} names parent {parent}, which does not list it exactly once")]
    ParentMismatch { child: NodeId, parent: NodeId },

    #[error("node {parent} lists child {child}, which does not point back")]
    ChildMismatch { parent: NodeId, child: NodeId },

    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),
}

/// Result of fast verification.
#[derive(Debug)]
pub struct VerifyResult {
    /// Whether verification passed
    pub ok: bool,
    /// Errors found during verification
    pub errors: Vec<VerifyError>,
}

impl VerifyResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: vec![],
        }
    }

    /// Create a failed result with errors.
    pub fn failure(errors: Vec<VerifyError>) -> Self {
        Self { ok: false, errors }
    }
}

/// Check every structural invariant of `tree`.
pub fn fast_verify(tree: &AssemblyTree) -> VerifyResult {
    let mut errors = Vec::new();
    let root = tree.root();

    if tree.parent_of(root).is_some() {
        errors.push(VerifyError::RootHasParent(root));
    }

    for node in tree.nodes() {
        let id = node.id();

        for child in node.children() {
            if tree.parent_of(*child) != Some(id) {
                errors.push(VerifyError::ChildMismatch {
                    parent: id,
                    child: *child,
                });
            }
        }

        if id == root {
            continue;
        }
        match node.parent() {
            None => errors.push(VerifyError::MissingParent(id)),
            Some(parent) => {
                let listed = tree
                    .children_of(parent)
                    .iter()
                    .filter(|c| **c == id)
                    .count();
                if listed != 1 {
                    errors.push(VerifyError::ParentMismatch { child: id, parent });
                }
            }
        }
    }

    // Reachability; `reached` doubles as the visited set, so cycles terminate.
    let mut reached = HashSet::new();
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if reached.insert(current) {
            stack.extend(tree.children_of(current).iter().copied());
        }
    }
    for id in tree.node_ids() {
        if !reached.contains(&id) {
            errors.push(VerifyError::Unreachable(id));
        }
    }

    if errors.is_empty() {
        VerifyResult::success()
    } else {
        VerifyResult::failure(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tree_verifies() {
        let tree = AssemblyTree::new(NodeId::new(1), "root");
        assert!(fast_verify(&tree).ok);
    }

    #[test]
    fn mutated_tree_verifies() {
        let mut tree = AssemblyTree::new(NodeId::new(1), "root");
        let a = tree.create_node(tree.root(), "a").unwrap();
        let b = tree.create_node(tree.root(), "b").unwrap();
        let c = tree.create_node(a, "c").unwrap();
        tree.move_node(c, b).unwrap();
        tree.remove_node(a).unwrap();
        let result = fast_verify(&tree);
        assert!(result.ok, "{:?}", result.errors);
    }

    #[test]
    fn corrupted_child_list_is_reported() {
        let mut tree = AssemblyTree::new(NodeId::new(1), "root");
        let a = tree.create_node(tree.root(), "a").unwrap();
        if let Some(children) = tree.children_mut(tree.root()) {
            children.push(a);
        }
        let result = fast_verify(&tree);
        assert!(!result.ok);
        assert!(result.errors.contains(&VerifyError::ParentMismatch {
            child: a,
            parent: NodeId::new(1)
        }));
    }
}
