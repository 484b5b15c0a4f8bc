//! assembly-lattice - Restructure part/assembly hierarchies and view them as
//! a leveled lattice
//!
//! An assembly is a tree of parts grouped into sub-assemblies. This crate
//! loads such a tree, lets an operator regroup it (assemble, flatten,
//! disaggregate, aggregate, add, remove, move) and keeps a derived lattice
//! view, where every node sits on the level of its depth, in step with it.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Edit operations: Validate → Gate → Mutate → Refresh
//! - [`lattice`] - Level assignment, graph layout and picking
//! - [`parser`] - Reading assembly descriptions into trees
//! - [`core`] - Domain types, the tree, ordering, verification and config
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! 1. The root has no parent and is never moved or removed
//! 2. Every parent/child link is mirrored exactly once in both directions
//! 3. Identifiers are never reused within a session
//! 4. A failed edit leaves the tree unchanged

pub mod cli;
pub mod core;
pub mod engine;
pub mod lattice;
pub mod parser;
pub mod ui;
