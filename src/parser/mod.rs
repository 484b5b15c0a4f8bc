//! parser
//!
//! The import boundary: reading an assembly description and turning it into
//! an [`AssemblyTree`].
//!
//! # Architecture
//!
//! Importers implement [`AssemblyParser`], producing a flat [`RawAssembly`]
//! (a list of nodes with parent pointers). [`build_initial_tree`] validates
//! that list and builds the tree. A CAD importer plugs in behind the same
//! trait; the bundled [`DocumentParser`] reads JSON or TOML.
//!
//! # Invariants
//!
//! - A failed load installs nothing: validation happens before any tree
//!   exists
//! - Imported identifiers are preserved exactly
//!
//! # Document format
//!
//! ```json
//! {
//!   "name": "bicycle",
//!   "nodes": [
//!     { "id": 1, "tag": "bicycle" },
//!     { "id": 2, "tag": "frame", "parent": 1, "leaf": true },
//!     { "id": 3, "tag": "wheel", "parent": 1, "leaf": true }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::sort::SortOrdering;
use crate::core::tree::AssemblyTree;
use crate::core::types::{NodeId, NodeKind};

/// Errors from loading an assembly.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("unsupported assembly format for '{0}' (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("assembly has no nodes")]
    Empty,

    #[error("assembly has no root node")]
    NoRoot,

    #[error("assembly has several root nodes: {0:?}")]
    MultipleRoots(Vec<NodeId>),

    #[error("node id {0} appears more than once")]
    DuplicateId(NodeId),

    #[error("node {node} names unknown parent {parent}")]
    UnknownParent { node: NodeId, parent: NodeId },

    #[error("nodes not reachable from the root (cycle?): {0:?}")]
    Unreachable(Vec<NodeId>),
}

/// One node as described by an importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawNode {
    pub id: NodeId,
    pub tag: String,
    #[serde(default)]
    pub parent: Option<NodeId>,
    /// Importer's leaf classification, if it has one.
    #[serde(default)]
    pub leaf: Option<bool>,
}

/// Flat description of an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAssembly {
    #[serde(default)]
    pub name: Option<String>,
    pub nodes: Vec<RawNode>,
}

impl RawAssembly {
    /// Importer's classification of `id`, if it gave one.
    pub fn is_leaf(&self, id: NodeId) -> Option<bool> {
        self.nodes.iter().find(|n| n.id == id).and_then(|n| n.leaf)
    }
}

/// Source of raw assemblies.
pub trait AssemblyParser {
    /// Read and decode the file at `path`.
    ///
    /// # Errors
    ///
    /// `ParseError` when the file is unreadable or malformed.
    fn load(&self, path: &Path) -> Result<RawAssembly, ParseError>;
}

/// Document encodings understood by [`DocumentParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }
}

/// Reads JSON or TOML assembly documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

impl DocumentParser {
    /// Decode `contents`; `path` is only used in error messages.
    pub fn parse_str(
        &self,
        contents: &str,
        format: DocumentFormat,
        path: &Path,
    ) -> Result<RawAssembly, ParseError> {
        let malformed = |message: String| ParseError::Malformed {
            path: path.to_path_buf(),
            message,
        };
        match format {
            DocumentFormat::Json => serde_json::from_str(contents).map_err(|e| malformed(e.to_string())),
            DocumentFormat::Toml => toml::from_str(contents).map_err(|e| malformed(e.to_string())),
        }
    }
}

impl AssemblyParser for DocumentParser {
    fn load(&self, path: &Path) -> Result<RawAssembly, ParseError> {
        let format = DocumentFormat::from_path(path)
            .ok_or_else(|| ParseError::UnsupportedFormat(path.to_path_buf()))?;
        let contents = std::fs::read_to_string(path).map_err(|e| ParseError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_str(&contents, format, path)
    }
}

/// Validate `raw` and build its tree, sorted with `ordering`.
///
/// Nodes are inserted parents-first, children in document order, then every
/// sibling list is sorted once. Importer leaf hints that disagree with the
/// resulting shape are logged and otherwise ignored: kind follows shape.
pub fn build_initial_tree(
    raw: &RawAssembly,
    ordering: &SortOrdering,
) -> Result<AssemblyTree, ParseError> {
    if raw.nodes.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut by_id: HashMap<NodeId, &RawNode> = HashMap::with_capacity(raw.nodes.len());
    for node in &raw.nodes {
        if by_id.insert(node.id, node).is_some() {
            return Err(ParseError::DuplicateId(node.id));
        }
    }

    let roots: Vec<NodeId> = raw
        .nodes
        .iter()
        .filter(|n| n.parent.is_none())
        .map(|n| n.id)
        .collect();
    let root = match roots.as_slice() {
        [] => return Err(ParseError::NoRoot),
        [only] => *only,
        _ => return Err(ParseError::MultipleRoots(roots)),
    };

    let mut children: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for node in &raw.nodes {
        if let Some(parent) = node.parent {
            if !by_id.contains_key(&parent) {
                return Err(ParseError::UnknownParent {
                    node: node.id,
                    parent,
                });
            }
            children.entry(parent).or_default().push(node.id);
        }
    }

    // Breadth-first from the root; anything not reached sits on a cycle.
    let mut order = vec![root];
    let mut cursor = 0;
    while cursor < order.len() {
        if let Some(kids) = children.get(&order[cursor]) {
            order.extend(kids.iter().copied());
        }
        cursor += 1;
    }
    if order.len() != raw.nodes.len() {
        let reached: BTreeSet<NodeId> = order.iter().copied().collect();
        let missing = raw
            .nodes
            .iter()
            .map(|n| n.id)
            .filter(|id| !reached.contains(id))
            .collect();
        return Err(ParseError::Unreachable(missing));
    }

    let mut tree = AssemblyTree::new(root, by_id[&root].tag.clone());
    for id in order.iter().skip(1) {
        let node = by_id[id];
        let parent = node.parent.unwrap_or(root);
        // Parents precede children in `order` and ids are unique.
        if let Err(e) = tree.insert_node(parent, node.id, node.tag.clone()) {
            tracing::error!(node = %node.id, error = %e, "validated node rejected by tree");
            return Err(ParseError::UnknownParent {
                node: node.id,
                parent,
            });
        }
    }

    ordering.sort_subtree(&mut tree, root);

    for node in &raw.nodes {
        if let (Some(hint), Some(kind)) = (node.leaf, tree.kind(node.id)) {
            if hint != (kind == NodeKind::Leaf) {
                tracing::warn!(
                    node = %node.id,
                    hint = if hint { "leaf" } else { "assembly" },
                    shape = %kind,
                    "importer classification disagrees with tree shape; using shape"
                );
            }
        }
    }

    tracing::debug!(
        name = raw.name.as_deref().unwrap_or(""),
        nodes = tree.len(),
        "built initial tree"
    );
    Ok(tree)
}
