//! lattice command - Print the lattice projection of an assembly

use std::path::Path;

use serde::Serialize;

use crate::core::types::NodeId;
use crate::engine::Context;
use crate::lattice::{Edge, Lattice, LatticeStyle, Vertex};
use crate::ui::render::render_lattice;
use anyhow::{Context as _, Result};

#[derive(Serialize)]
struct LatticeJson<'a> {
    levels: Vec<&'a [NodeId]>,
    vertices: &'a [Vertex],
    edges: &'a [Edge],
}

/// Print levels, vertices and edges for `file`.
pub fn lattice(ctx: &Context, file: &Path, json: bool) -> Result<()> {
    let config = super::load_config_for(ctx, file)?;
    let tree = super::load_tree(file, &config)?;
    let lattice = Lattice::project(&tree, &LatticeStyle::from_config(&config));

    if json {
        let doc = LatticeJson {
            levels: lattice.levels().rows().map(|(_, row)| row).collect(),
            vertices: lattice.graph().vertices(),
            edges: lattice.graph().edges(),
        };
        let text = serde_json::to_string_pretty(&doc).context("Failed to encode lattice")?;
        println!("{}", text);
    } else {
        print!("{}", render_lattice(&lattice));
    }
    Ok(())
}
