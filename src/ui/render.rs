//! ui::render
//!
//! Plain-text views of a tree and its lattice.

use std::fmt::Write as _;

use crate::core::tree::AssemblyTree;
use crate::core::types::NodeId;
use crate::engine::ViewState;
use crate::lattice::Lattice;

/// Indented tree, children in display order.
///
/// With a view, selected nodes carry a `* ` prefix and checked nodes a
/// `[checked]` suffix.
pub fn render_tree(tree: &AssemblyTree, view: Option<&ViewState>) -> String {
    let mut out = String::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(tree.root(), 0)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let selected = view.is_some_and(|v| v.selected.contains(id));
        let checked = view.is_some_and(|v| v.checked.contains(id));

        let _ = write!(
            out,
            "{}{}{} [{}] ({})",
            if selected { "* " } else { "  " },
            "  ".repeat(depth),
            node.tag(),
            id,
            node.kind()
        );
        if !node.history().is_empty() {
            let _ = write!(
                out,
                " history: {}",
                super::output::format_ids(node.history())
            );
        }
        if checked {
            out.push_str(" [checked]");
        }
        out.push('\n');

        for child in node.children().iter().rev() {
            stack.push((*child, depth + 1));
        }
    }
    out
}

/// Levels, vertices and edges of a lattice.
pub fn render_lattice(lattice: &Lattice) -> String {
    let graph = lattice.graph();
    let mut out = String::new();
    for (level, row) in lattice.levels().rows() {
        let _ = writeln!(out, "level {}", level);
        for id in row {
            if let Some(v) = graph.vertex(*id) {
                let _ = writeln!(
                    out,
                    "  {} {} ({}, {}) {}",
                    v.id, v.label, v.x, v.y, v.colour
                );
            }
        }
    }
    if !graph.edges().is_empty() {
        out.push_str("edges\n");
        for edge in graph.edges() {
            let _ = writeln!(out, "  {} -> {}", edge.parent, edge.child);
        }
    }
    out
}
