//! lattice::graph
//!
//! Positioned lattice graph derived from a tree and its level map.
//!
//! # Layout
//!
//! - y = level × `y_spacing`, growing downward (view coordinates)
//! - each level is centred on x = 0 with `x_spacing` between neighbours, in
//!   level-map order
//! - edges mirror the tree's parent→child relation
//!
//! Colour is presentation state only: [`LatticeGraph::apply_selection`]
//! repaints every vertex on each selection change. The painted set is kept
//! alongside, so it stays readable whatever the two colours are.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use super::levels::LevelMap;
use super::LatticeStyle;
use crate::core::tree::AssemblyTree;
use crate::core::types::NodeId;

/// One positioned node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vertex {
    pub id: NodeId,
    pub label: String,
    pub level: usize,
    pub x: f64,
    pub y: f64,
    pub colour: String,
}

/// A parent→child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
}

/// The drawable lattice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    #[serde(skip)]
    index: HashMap<NodeId, usize>,
    #[serde(skip)]
    default_colour: String,
    #[serde(skip)]
    selected_colour: String,
    #[serde(skip)]
    painted: BTreeSet<NodeId>,
}

impl LatticeGraph {
    /// Vertices, level by level, in layout order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Edges in parent-then-child-order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a vertex.
    pub fn vertex(&self, id: NodeId) -> Option<&Vertex> {
        self.index.get(&id).map(|i| &self.vertices[*i])
    }

    /// Ids currently painted with the selection colour.
    pub fn selected(&self) -> BTreeSet<NodeId> {
        self.painted.clone()
    }

    /// Reset every vertex to the default colour, then paint `selected`.
    ///
    /// Ids with no vertex are ignored.
    pub fn apply_selection<'a, I>(&mut self, selected: I)
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        for vertex in &mut self.vertices {
            vertex.colour.clone_from(&self.default_colour);
        }
        self.painted.clear();
        for id in selected {
            if let Some(i) = self.index.get(id) {
                self.vertices[*i].colour.clone_from(&self.selected_colour);
                self.painted.insert(*id);
            }
        }
    }
}

/// Build the graph for `tree` from a freshly computed `levels`.
pub fn build_graph(tree: &AssemblyTree, levels: &LevelMap, style: &LatticeStyle) -> LatticeGraph {
    let mut vertices = Vec::with_capacity(levels.len());
    let mut index = HashMap::with_capacity(levels.len());

    for (level, row) in levels.rows() {
        let centre = (row.len() as f64 - 1.0) / 2.0;
        let y = level as f64 * style.y_spacing;
        for (i, id) in row.iter().enumerate() {
            let Some(node) = tree.get(*id) else {
                continue;
            };
            index.insert(*id, vertices.len());
            vertices.push(Vertex {
                id: *id,
                label: node.tag().to_string(),
                level,
                x: (i as f64 - centre) * style.x_spacing,
                y,
                colour: style.default_colour.clone(),
            });
        }
    }

    let edges = vertices
        .iter()
        .flat_map(|v| {
            tree.children_of(v.id).iter().map(move |c| Edge {
                parent: v.id,
                child: *c,
            })
        })
        .collect();

    LatticeGraph {
        vertices,
        edges,
        index,
        default_colour: style.default_colour.clone(),
        selected_colour: style.selected_colour.clone(),
        painted: BTreeSet::new(),
    }
}
