//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`NodeId`] - Unique, never-reused node identifier
//! - [`NodeKind`] - Closed Leaf/Assembly classification
//!
//! # Examples
//!
//! ```
//! use assembly_lattice::core::types::{NodeId, NodeKind};
//!
//! let id = NodeId::new(7);
//! assert_eq!(id.get(), 7);
//! assert_eq!(id.to_string(), "7");
//!
//! assert!(NodeKind::Assembly.accepts_children());
//! assert!(!NodeKind::Leaf.accepts_children());
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),
}

/// Identifier of one node in an assembly tree.
///
/// Identifiers are stable for a node's lifetime and never reused once the
/// node is removed. They also serve as the default numeric sort key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier immediately after this one.
    ///
    /// Returns `None` on overflow.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for NodeId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidNodeId(s.to_string()))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of a node.
///
/// The kind is derived from shape: a node with no children is a `Leaf`, any
/// node with children is an `Assembly`. All kind-dependent decisions match on
/// this enum rather than probing the tree ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An irreducible part.
    Leaf,
    /// A container grouping other nodes.
    Assembly,
}

impl NodeKind {
    /// Derive the kind from a child count.
    pub fn from_child_count(count: usize) -> Self {
        if count == 0 {
            NodeKind::Leaf
        } else {
            NodeKind::Assembly
        }
    }

    /// Whether edit operations may add children to a node of this kind
    /// without first disaggregating it.
    pub fn accepts_children(self) -> bool {
        match self {
            NodeKind::Leaf => false,
            NodeKind::Assembly => true,
        }
    }

    /// Human-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Leaf => "part",
            NodeKind::Assembly => "assembly",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_parses_with_whitespace() {
        assert_eq!(" 42 ".parse::<NodeId>().unwrap(), NodeId::new(42));
    }

    #[test]
    fn node_id_rejects_garbage() {
        assert_eq!(
            "4x".parse::<NodeId>(),
            Err(TypeError::InvalidNodeId("4x".into()))
        );
        assert!("-1".parse::<NodeId>().is_err());
    }

    #[test]
    fn node_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&NodeId::new(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn checked_next_overflows_to_none() {
        assert_eq!(NodeId::new(1).checked_next(), Some(NodeId::new(2)));
        assert_eq!(NodeId::new(u64::MAX).checked_next(), None);
    }

    #[test]
    fn kind_from_child_count() {
        assert_eq!(NodeKind::from_child_count(0), NodeKind::Leaf);
        assert_eq!(NodeKind::from_child_count(3), NodeKind::Assembly);
    }
}
