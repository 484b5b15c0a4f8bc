//! core
//!
//! Core domain types and the assembly tree.
//!
//! # Modules
//!
//! - [`types`] - Strong types: NodeId, NodeKind
//! - [`ids`] - Identifier allocation
//! - [`tree`] - The assembly tree and its mutations
//! - [`sort`] - Sibling ordering
//! - [`verify`] - Fast verification of tree invariants
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Every tree mutation is all-or-nothing
//! - All verification is deterministic

pub mod config;
pub mod ids;
pub mod sort;
pub mod tree;
pub mod types;
pub mod verify;
