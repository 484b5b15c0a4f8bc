//! lattice
//!
//! Projection of the assembly tree into a leveled, positioned graph.
//!
//! # Modules
//!
//! - [`levels`] - Level assignment
//! - [`graph`] - Vertex positions, edges and colours
//! - [`pick`] - Nearest-node lookup for clicks
//!
//! # Invariants
//!
//! - The projection is derived, never authoritative
//! - It is rebuilt from scratch after every tree mutation; there is no
//!   incremental patching. Cost is linear in tree size per rebuild.
//!
//! # Example
//!
//! ```
//! use assembly_lattice::core::tree::AssemblyTree;
//! use assembly_lattice::core::types::NodeId;
//! use assembly_lattice::lattice::{Lattice, LatticeStyle};
//!
//! let mut tree = AssemblyTree::new(NodeId::new(1), "root");
//! let a = tree.create_node(tree.root(), "a").unwrap();
//!
//! let lattice = Lattice::project(&tree, &LatticeStyle::default());
//! assert_eq!(lattice.levels().level_of(a), Some(1));
//! assert_eq!(lattice.nearest_node(0.2, 0.9), Some(a));
//! ```

pub mod graph;
pub mod levels;
pub mod pick;

pub use graph::{build_graph, Edge, LatticeGraph, Vertex};
pub use levels::{recompute_levels, LevelMap};
pub use pick::nearest_node;

use serde::Serialize;

use crate::core::config::Config;
use crate::core::tree::AssemblyTree;
use crate::core::types::NodeId;

/// Layout and colour parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeStyle {
    pub x_spacing: f64,
    pub y_spacing: f64,
    pub default_colour: String,
    pub selected_colour: String,
}

impl Default for LatticeStyle {
    fn default() -> Self {
        Self {
            x_spacing: 1.0,
            y_spacing: 1.0,
            default_colour: "gray".to_string(),
            selected_colour: "blue".to_string(),
        }
    }
}

impl LatticeStyle {
    /// Style resolved from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            x_spacing: config.x_spacing(),
            y_spacing: config.y_spacing(),
            default_colour: config.default_colour(),
            selected_colour: config.selected_colour(),
        }
    }
}

/// Levels and graph computed together from one tree state.
#[derive(Debug, Clone, Serialize)]
pub struct Lattice {
    levels: LevelMap,
    graph: LatticeGraph,
}

impl Lattice {
    /// Recompute levels, then build the graph.
    pub fn project(tree: &AssemblyTree, style: &LatticeStyle) -> Self {
        let levels = recompute_levels(tree);
        let graph = build_graph(tree, &levels, style);
        Self { levels, graph }
    }

    /// The level map.
    pub fn levels(&self) -> &LevelMap {
        &self.levels
    }

    /// The positioned graph.
    pub fn graph(&self) -> &LatticeGraph {
        &self.graph
    }

    /// Repaint for a new selection.
    pub fn apply_selection<'a, I>(&mut self, selected: I)
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        self.graph.apply_selection(selected);
    }

    /// Node nearest to a click at `(x, y)`.
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<NodeId> {
        nearest_node((x, y), &self.levels, &self.graph)
    }
}
