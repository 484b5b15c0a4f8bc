//! engine::error
//!
//! Failures reported by edit operations.
//!
//! Every variant is recoverable: an operation that returns an error has left
//! the tree exactly as it found it.

use thiserror::Error;

use crate::core::tree::TreeError;
use crate::core::types::NodeId;

/// Why an edit was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Nothing is selected.
    #[error("nothing selected")]
    NoSelection,

    /// Wrong number or kind of selected nodes, or a stale reference.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// The operation would move, remove or reparent the root.
    #[error("node {0} is the root and cannot be moved or removed")]
    RootViolation(NodeId),

    /// New nodes cannot be created under this node (missing, or a part).
    #[error("cannot create nodes under {0}")]
    InvalidParent(NodeId),

    /// The move would place a node inside its own subtree.
    #[error("cannot move node {node} under {target}, which lies within its own subtree")]
    DescendantViolation { node: NodeId, target: NodeId },

    /// The confirmation prompt was declined.
    #[error("edit cancelled")]
    Cancelled,

    /// Tree-level rejection that slipped past validation.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl EditError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EditError::InvalidSelection(reason.into())
    }
}
