//! core::ids
//!
//! Node identifier allocation.
//!
//! # Rules
//!
//! - A fresh identifier is strictly greater than every identifier ever
//!   assigned in the tree, including ones that were later removed.
//! - Identifiers seeded from an import (which may be sparse and large) are
//!   observed, never assumed to come from this allocator.
//! - Freed identifiers are never handed out again.
//!
//! # Example
//!
//! ```
//! use assembly_lattice::core::ids::{next_after, IdAllocator};
//! use assembly_lattice::core::types::NodeId;
//!
//! let existing = [NodeId::new(3), NodeId::new(10), NodeId::new(4)];
//! assert_eq!(next_after(existing), Some(NodeId::new(11)));
//!
//! let mut ids = IdAllocator::default();
//! ids.observe(NodeId::new(10));
//! assert_eq!(ids.allocate(), Some(NodeId::new(11)));
//! assert_eq!(ids.allocate(), Some(NodeId::new(12)));
//! ```

use super::types::NodeId;

/// One past the largest identifier in `existing`.
///
/// Returns `None` when `existing` is empty (there is no tree to allocate in)
/// or when the largest identifier is already `u64::MAX`.
pub fn next_after<I>(existing: I) -> Option<NodeId>
where
    I: IntoIterator<Item = NodeId>,
{
    existing.into_iter().max()?.checked_next()
}

/// High-water-mark allocator.
///
/// Every identifier that enters a tree is passed to [`IdAllocator::observe`];
/// [`IdAllocator::allocate`] then returns one past the largest identifier
/// ever observed, so removing the current maximum does not make it reusable.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    high_water: Option<NodeId>,
}

impl IdAllocator {
    /// Record an identifier that is now part of the tree.
    pub fn observe(&mut self, id: NodeId) {
        self.high_water = Some(match self.high_water {
            Some(current) => current.max(id),
            None => id,
        });
    }

    /// Largest identifier observed so far.
    pub fn high_water(&self) -> Option<NodeId> {
        self.high_water
    }

    /// Issue a fresh identifier and record it as used.
    ///
    /// Returns `None` if nothing was ever observed, or on overflow.
    pub fn allocate(&mut self) -> Option<NodeId> {
        let next = next_after(self.high_water)?;
        self.high_water = Some(next);
        Some(next)
    }
}
