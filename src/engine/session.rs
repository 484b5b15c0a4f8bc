//! engine::session
//!
//! Edit operations over one loaded assembly.
//!
//! # Lifecycle of an operation
//!
//! ```text
//! Validate -> Gate -> Mutate -> Refresh
//! ```
//!
//! Validation reads the tree and the caller's [`ViewState`] and may reject
//! the request. The gate asks the [`Confirmer`] the first time a session
//! edits anything. Only then is the tree mutated, after which the selection
//! and checked sets are cleared and the lattice is rebuilt from scratch.
//!
//! # Invariants
//!
//! - A rejected or cancelled operation leaves the tree untouched
//! - The lattice always reflects the current tree, except that a sibling
//!   reorder does not rebuild it (rows ignore sibling order)
//! - The root is never moved, removed or reparented

use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::confirm::{ConfirmGate, Confirmer};
use super::error::EditError;
use super::selection::ViewState;
use crate::core::config::{Config, DEFAULT_LABEL};
use crate::core::sort::{renumber_for_drop, SortDirection, SortMode, SortOrdering};
use crate::core::tree::{AssemblyTree, TreeError};
use crate::core::types::{NodeId, NodeKind};
use crate::core::verify::fast_verify;
use crate::lattice::{Lattice, LatticeStyle};
use crate::parser::{build_initial_tree, AssemblyParser, ParseError};

/// Operations that can be offered for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Assemble,
    Flatten,
    Disaggregate,
    Aggregate,
    AddNode,
    RemoveNode,
    ToggleSortMode,
    ToggleSortDirection,
    SortAlphabetical,
    SortByIdentity,
}

impl Operation {
    /// The session command that runs this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Assemble => "assemble",
            Operation::Flatten => "flatten",
            Operation::Disaggregate => "disaggregate",
            Operation::Aggregate => "aggregate",
            Operation::AddNode => "add",
            Operation::RemoveNode => "remove",
            Operation::ToggleSortMode => "sort toggle",
            Operation::ToggleSortDirection => "sort reverse",
            Operation::SortAlphabetical => "sort alpha",
            Operation::SortByIdentity => "sort id",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings a session starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub ordering: SortOrdering,
    pub style: LatticeStyle,
    pub new_assembly_label: String,
    pub new_part_label: String,
    /// Ask before the first edit.
    pub confirm_edits: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            ordering: SortOrdering::default(),
            style: LatticeStyle::default(),
            new_assembly_label: DEFAULT_LABEL.to_string(),
            new_part_label: DEFAULT_LABEL.to_string(),
            confirm_edits: true,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ordering: config.sort_ordering(),
            style: LatticeStyle::from_config(config),
            new_assembly_label: config.new_assembly_label(),
            new_part_label: config.new_part_label(),
            confirm_edits: config.confirm_edits(),
        }
    }
}

/// What Flatten did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Leaves moved up to the target, in breadth-first order.
    pub promoted: Vec<NodeId>,
    /// Intermediate assemblies deleted.
    pub removed: Vec<NodeId>,
}

/// What a drag-and-drop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source and destination were siblings; only display order changed.
    Reordered { parent: NodeId },
    /// Source now hangs under `parent`.
    Moved { parent: NodeId },
}

/// A loaded assembly with its projection and edit state.
#[derive(Debug, Clone)]
pub struct EditSession {
    tree: AssemblyTree,
    lattice: Lattice,
    ordering: SortOrdering,
    style: LatticeStyle,
    new_assembly_label: String,
    new_part_label: String,
    gate: ConfirmGate,
}

impl EditSession {
    /// Start a session over an already-sorted tree.
    pub fn new(tree: AssemblyTree, options: SessionOptions) -> Self {
        let lattice = Lattice::project(&tree, &options.style);
        Self {
            tree,
            lattice,
            ordering: options.ordering,
            style: options.style,
            new_assembly_label: options.new_assembly_label,
            new_part_label: options.new_part_label,
            gate: ConfirmGate::new(options.confirm_edits),
        }
    }

    /// Load `path` through `parser` and start a session over it.
    ///
    /// # Errors
    ///
    /// Any `ParseError`; nothing is constructed on failure.
    pub fn open(
        parser: &dyn AssemblyParser,
        path: &Path,
        options: SessionOptions,
    ) -> Result<Self, ParseError> {
        let raw = parser.load(path)?;
        let tree = build_initial_tree(&raw, &options.ordering)?;
        tracing::info!(path = %path.display(), nodes = tree.len(), "loaded assembly");
        Ok(Self::new(tree, options))
    }

    pub fn tree(&self) -> &AssemblyTree {
        &self.tree
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn ordering(&self) -> SortOrdering {
        self.ordering
    }

    /// Whether edits no longer need confirmation.
    pub fn gate_granted(&self) -> bool {
        self.gate.is_granted()
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    /// Group the selected nodes under a new assembly.
    ///
    /// The new assembly is created beside the shallowest selected node (the
    /// first one selected, on a tie) and every selected node becomes its
    /// child. Returns the new assembly's id.
    pub fn assemble(
        &mut self,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<NodeId, EditError> {
        let ids = self.selected(view)?;
        if ids.len() < 2 {
            return Err(EditError::invalid(format!(
                "assemble needs at least two nodes, got {}",
                ids.len()
            )));
        }
        let root = self.tree.root();
        if ids.contains(&root) {
            return Err(EditError::RootViolation(root));
        }

        let mut anchor = ids[0];
        let mut shallowest = usize::MAX;
        for id in &ids {
            let depth = self.tree.depth(*id).unwrap_or(usize::MAX);
            if depth < shallowest {
                shallowest = depth;
                anchor = *id;
            }
        }
        let parent = self
            .tree
            .parent_of(anchor)
            .ok_or(EditError::RootViolation(anchor))?;

        self.gate.pass(confirmer)?;

        let assembly = self
            .tree
            .create_node(parent, self.new_assembly_label.clone())?;
        for id in &ids {
            self.tree.move_node(*id, assembly)?;
        }
        self.ordering.sort_children(&mut self.tree, assembly);
        self.ordering.sort_children(&mut self.tree, parent);

        tracing::info!(assembly = %assembly, parent = %parent, members = ?ids, "assembled");
        self.refresh(view);
        Ok(assembly)
    }

    /// Pull every leaf below the selected assembly up to it and delete the
    /// assemblies in between.
    pub fn flatten(
        &mut self,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<FlattenReport, EditError> {
        let target = self.single_of_kind(view, NodeKind::Assembly, "flatten")?;

        self.gate.pass(confirmer)?;

        let direct = self.tree.children_of(target).to_vec();
        let (leaves, assemblies): (Vec<NodeId>, Vec<NodeId>) = self
            .tree
            .all_descendants(target)
            .into_iter()
            .partition(|id| self.tree.kind(*id) == Some(NodeKind::Leaf));

        let mut report = FlattenReport::default();
        for leaf in leaves {
            if !direct.contains(&leaf) {
                self.tree.move_node(leaf, target)?;
                report.promoted.push(leaf);
            }
        }
        for assembly in assemblies {
            // Nested assemblies are already gone with their ancestor.
            report.removed.extend(self.tree.remove_node(assembly)?);
        }
        self.ordering.sort_children(&mut self.tree, target);

        tracing::info!(
            target = %target,
            promoted = report.promoted.len(),
            removed = report.removed.len(),
            "flattened"
        );
        self.refresh(view);
        Ok(report)
    }

    /// Split the selected part into two new parts beneath it.
    pub fn disaggregate(
        &mut self,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<[NodeId; 2], EditError> {
        let target = self.single_of_kind(view, NodeKind::Leaf, "disaggregate")?;
        if self
            .tree
            .peek_next_id()
            .and_then(NodeId::checked_next)
            .is_none()
        {
            return Err(TreeError::IdsExhausted.into());
        }

        self.gate.pass(confirmer)?;

        let first = self.tree.create_node(target, self.new_part_label.clone())?;
        let second = self.tree.create_node(target, self.new_part_label.clone())?;
        self.ordering.sort_children(&mut self.tree, target);

        tracing::info!(target = %target, first = %first, second = %second, "disaggregated");
        self.refresh(view);
        Ok([first, second])
    }

    /// Collapse the selected assembly's children into its history.
    ///
    /// Returns the ids now held as history. They are gone from the tree and
    /// are never handed out again.
    pub fn aggregate(
        &mut self,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<Vec<NodeId>, EditError> {
        let target = self.single_of_kind(view, NodeKind::Assembly, "aggregate")?;

        self.gate.pass(confirmer)?;

        let history = self.tree.children_of(target).to_vec();
        for child in &history {
            self.tree.remove_node(*child)?;
        }
        self.tree.set_history(target, history.clone())?;

        tracing::info!(target = %target, history = ?history, "aggregated");
        self.refresh(view);
        Ok(history)
    }

    /// Add one new part under the selected assembly.
    ///
    /// A selected Leaf is a disallowed parent and yields `InvalidParent`
    /// rather than `InvalidSelection`: the selection itself is well formed,
    /// the node it names just cannot take children here.
    pub fn add_node(
        &mut self,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<NodeId, EditError> {
        let parent = self.single(view)?;
        if self.tree.kind(parent) == Some(NodeKind::Leaf) {
            return Err(EditError::InvalidParent(parent));
        }

        self.gate.pass(confirmer)?;

        let id = self.tree.create_node(parent, self.new_part_label.clone())?;
        self.ordering.sort_children(&mut self.tree, parent);

        tracing::info!(parent = %parent, node = %id, "added node");
        self.refresh(view);
        Ok(id)
    }

    /// Remove every selected node with its subtree.
    ///
    /// Returns every removed id. Selecting a node together with one of its
    /// ancestors is fine: the second removal finds nothing left to do.
    pub fn remove_nodes(
        &mut self,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<Vec<NodeId>, EditError> {
        let ids = self.selected(view)?;
        let root = self.tree.root();
        if ids.contains(&root) {
            return Err(EditError::RootViolation(root));
        }

        self.gate.pass(confirmer)?;

        let mut removed = Vec::new();
        for id in ids {
            removed.extend(self.tree.remove_node(id)?);
        }

        tracing::info!(removed = ?removed, "removed nodes");
        self.refresh(view);
        Ok(removed)
    }

    /// Drop `source` onto `destination`.
    ///
    /// Siblings are reordered: `source` takes `destination`'s place, the
    /// numeric keys are renumbered and identity ordering becomes active.
    /// Otherwise `source` moves under `destination`'s parent. Neither end
    /// of the drag may be the root.
    pub fn reparent(
        &mut self,
        source: NodeId,
        destination: NodeId,
        view: &mut ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<MoveOutcome, EditError> {
        for id in [source, destination] {
            if !self.tree.contains(id) {
                return Err(EditError::invalid(format!("node {} does not exist", id)));
            }
        }
        let old_parent = self
            .tree
            .parent_of(source)
            .ok_or(EditError::RootViolation(source))?;
        let dest_parent = self
            .tree
            .parent_of(destination)
            .ok_or(EditError::RootViolation(destination))?;

        if dest_parent == old_parent {
            self.gate.pass(confirmer)?;
            self.reorder_siblings(old_parent, source, destination);
            tracing::info!(parent = %old_parent, node = %source, before = %destination, "reordered");
            return Ok(MoveOutcome::Reordered { parent: old_parent });
        }

        let new_parent = dest_parent;
        if new_parent == source || self.tree.is_descendant_of(new_parent, source) {
            return Err(EditError::DescendantViolation {
                node: source,
                target: new_parent,
            });
        }

        self.gate.pass(confirmer)?;

        self.tree.move_node(source, new_parent)?;
        self.ordering.sort_children(&mut self.tree, new_parent);

        tracing::info!(node = %source, from = %old_parent, to = %new_parent, "moved");
        self.refresh(view);
        Ok(MoveOutcome::Moved { parent: new_parent })
    }

    fn reorder_siblings(&mut self, parent: NodeId, source: NodeId, destination: NodeId) {
        renumber_for_drop(&mut self.tree, parent, source, destination);
        if self.ordering.direction == SortDirection::Descending {
            // Keys count up in display order; flip them so a descending
            // sort reproduces that order.
            let siblings = self.tree.children_of(parent).to_vec();
            let top = siblings.len() as u64 + 1;
            for child in siblings {
                if let Some(key) = self.tree.get(child).map(|n| n.sort_key()) {
                    let _ = self.tree.set_sort_key(child, top - key);
                }
            }
        }
        self.ordering.mode = SortMode::Identity;
        self.ordering.sort_children(&mut self.tree, parent);
    }

    /// Change a node's label.
    ///
    /// Gated like a structural edit. The selection is kept.
    pub fn rename(
        &mut self,
        id: NodeId,
        text: &str,
        view: &ViewState,
        confirmer: &mut dyn Confirmer,
    ) -> Result<(), EditError> {
        if !self.tree.contains(id) {
            return Err(EditError::invalid(format!("node {} does not exist", id)));
        }

        self.gate.pass(confirmer)?;

        self.tree.update_tag(id, text)?;
        if let Some(parent) = self.tree.parent_of(id) {
            self.ordering.sort_children(&mut self.tree, parent);
        }

        tracing::info!(node = %id, tag = text, "renamed");
        self.reproject(view);
        Ok(())
    }

    // =========================================================================
    // Sort tools
    // =========================================================================

    /// Switch between alphabetical and identity order, then re-sort the
    /// selected node's children.
    pub fn toggle_sort_mode(&mut self, view: &ViewState) -> Result<SortMode, EditError> {
        let target = self.sort_target(view)?;
        self.ordering.toggle_mode();
        self.ordering.sort_children(&mut self.tree, target);
        Ok(self.ordering.mode)
    }

    /// Flip the sort direction, then re-sort the selected node's children.
    pub fn toggle_sort_direction(&mut self, view: &ViewState) -> Result<SortDirection, EditError> {
        let target = self.sort_target(view)?;
        self.ordering.toggle_direction();
        self.ordering.sort_children(&mut self.tree, target);
        Ok(self.ordering.direction)
    }

    /// Sort the selected node's children by label.
    pub fn sort_alphabetical(&mut self, view: &ViewState) -> Result<(), EditError> {
        let target = self.sort_target(view)?;
        self.ordering.mode = SortMode::Alphabetical;
        self.ordering.sort_children(&mut self.tree, target);
        Ok(())
    }

    /// Sort the selected node's children by id, discarding manual order.
    pub fn sort_by_identity(&mut self, view: &ViewState) -> Result<(), EditError> {
        let target = self.sort_target(view)?;
        for child in self.tree.children_of(target).to_vec() {
            self.tree.set_sort_key(child, child.get())?;
        }
        self.ordering.mode = SortMode::Identity;
        self.ordering.sort_children(&mut self.tree, target);
        Ok(())
    }

    fn sort_target(&self, view: &ViewState) -> Result<NodeId, EditError> {
        let target = self.single(view)?;
        if self.tree.children_of(target).len() < 2 {
            return Err(EditError::invalid(format!(
                "node {} has fewer than two children to sort",
                target
            )));
        }
        Ok(target)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Add `ids` to the selection, in order. Returns how many were newly
    /// selected.
    ///
    /// Every id is checked first; if any is unknown the selection is left
    /// as it was.
    pub fn select(&mut self, view: &mut ViewState, ids: &[NodeId]) -> Result<usize, EditError> {
        for id in ids {
            self.ensure_exists(*id)?;
        }
        let added = ids.iter().filter(|id| view.selected.insert(**id)).count();
        self.repaint(view);
        Ok(added)
    }

    /// Drop `id` from the selection. Returns `false` if it was not selected.
    pub fn deselect(&mut self, view: &mut ViewState, id: NodeId) -> bool {
        let removed = view.selected.remove(id);
        self.repaint(view);
        removed
    }

    pub fn clear_selection(&mut self, view: &mut ViewState) {
        view.selected.clear();
        self.repaint(view);
    }

    /// Toggle selection of the node nearest to a click.
    ///
    /// Returns the node and whether it is now selected.
    pub fn pick(&mut self, view: &mut ViewState, x: f64, y: f64) -> Option<(NodeId, bool)> {
        let id = self.lattice.nearest_node(x, y)?;
        let selected = view.selected.toggle(id);
        tracing::debug!(x, y, node = %id, selected, "picked");
        self.repaint(view);
        Some((id, selected))
    }

    /// Toggle `id` in the checked set; returns whether it is now checked.
    pub fn toggle_checked(&self, view: &mut ViewState, id: NodeId) -> Result<bool, EditError> {
        self.ensure_exists(id)?;
        Ok(view.checked.toggle(id))
    }

    /// Operations that would pass validation for the current selection.
    pub fn available_operations(&self, view: &ViewState) -> Vec<Operation> {
        let Ok(ids) = self.selected(view) else {
            return Vec::new();
        };
        let root = self.tree.root();
        let includes_root = ids.contains(&root);

        let mut ops = Vec::new();
        match ids.as_slice() {
            [only] => {
                if self.tree.kind(*only) == Some(NodeKind::Leaf) {
                    ops.push(Operation::Disaggregate);
                } else {
                    ops.extend([Operation::Flatten, Operation::Aggregate, Operation::AddNode]);
                }
                if !includes_root {
                    ops.push(Operation::RemoveNode);
                }
                if self.tree.children_of(*only).len() > 1 {
                    ops.extend([
                        Operation::ToggleSortMode,
                        Operation::ToggleSortDirection,
                        Operation::SortAlphabetical,
                        Operation::SortByIdentity,
                    ]);
                }
            }
            _ if !includes_root => ops.extend([Operation::Assemble, Operation::RemoveNode]),
            _ => {}
        }
        ops
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_exists(&self, id: NodeId) -> Result<(), EditError> {
        if self.tree.contains(id) {
            Ok(())
        } else {
            Err(EditError::invalid(format!("node {} does not exist", id)))
        }
    }

    fn selected(&self, view: &ViewState) -> Result<Vec<NodeId>, EditError> {
        if view.selected.is_empty() {
            return Err(EditError::NoSelection);
        }
        for id in view.selected.iter() {
            if !self.tree.contains(*id) {
                return Err(EditError::invalid(format!("node {} no longer exists", id)));
            }
        }
        Ok(view.selected.as_slice().to_vec())
    }

    fn single(&self, view: &ViewState) -> Result<NodeId, EditError> {
        match self.selected(view)?.as_slice() {
            [only] => Ok(*only),
            many => Err(EditError::invalid(format!(
                "expected exactly one selected node, got {}",
                many.len()
            ))),
        }
    }

    fn single_of_kind(
        &self,
        view: &ViewState,
        kind: NodeKind,
        operation: &str,
    ) -> Result<NodeId, EditError> {
        let id = self.single(view)?;
        match self.tree.kind(id) {
            Some(actual) if actual == kind => Ok(id),
            _ => Err(EditError::invalid(format!(
                "{} applies to a single {} node; node {} is not one",
                operation, kind, id
            ))),
        }
    }

    fn repaint(&mut self, view: &ViewState) {
        self.lattice.apply_selection(view.selected.iter());
    }

    fn reproject(&mut self, view: &ViewState) {
        let check = fast_verify(&self.tree);
        if !check.ok {
            tracing::error!(errors = ?check.errors, "tree invariants broken after edit");
        }
        debug_assert!(check.ok, "tree invariants broken: {:?}", check.errors);

        self.lattice = Lattice::project(&self.tree, &self.style);
        self.repaint(view);
    }

    fn refresh(&mut self, view: &mut ViewState) {
        view.clear();
        self.reproject(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::confirm::FixedConfirmer;

    fn id(raw: u64) -> NodeId {
        NodeId::new(raw)
    }

    /// root(1) -> a(2) -> [c(4), d(5)], root -> b(3)
    fn session() -> EditSession {
        let mut tree = AssemblyTree::new(id(1), "root");
        tree.create_node(id(1), "a").unwrap();
        tree.create_node(id(1), "b").unwrap();
        tree.create_node(id(2), "c").unwrap();
        tree.create_node(id(2), "d").unwrap();
        EditSession::new(tree, SessionOptions::default())
    }

    #[test]
    fn empty_selection_is_reported() {
        let mut s = session();
        let mut yes = FixedConfirmer::approve();
        let mut view = ViewState::new();
        assert_eq!(s.assemble(&mut view, &mut yes), Err(EditError::NoSelection));
        assert_eq!(s.remove_nodes(&mut view, &mut yes), Err(EditError::NoSelection));
        assert_eq!(yes.asked(), 0);
    }

    #[test]
    fn stale_selection_is_invalid() {
        let mut s = session();
        let mut yes = FixedConfirmer::approve();
        let mut view = ViewState::with_selection([id(42)]);
        assert!(matches!(
            s.flatten(&mut view, &mut yes),
            Err(EditError::InvalidSelection(_))
        ));
    }

    #[test]
    fn validation_runs_before_gate() {
        let mut s = session();
        let mut no = FixedConfirmer::decline();
        let mut view = ViewState::with_selection([id(3)]);
        assert!(matches!(
            s.flatten(&mut view, &mut no),
            Err(EditError::InvalidSelection(_))
        ));
        assert_eq!(no.asked(), 0);
    }

    #[test]
    fn cancelled_edit_changes_nothing() {
        let mut s = session();
        let before = s.tree().clone();
        let mut no = FixedConfirmer::decline();
        let mut view = ViewState::with_selection([id(2), id(3)]);
        assert_eq!(s.assemble(&mut view, &mut no), Err(EditError::Cancelled));
        assert_eq!(s.tree().nodes().count(), before.nodes().count());
        assert_eq!(s.tree().children_of(id(1)), before.children_of(id(1)));
        assert_eq!(view.selected.len(), 2);
    }

    #[test]
    fn gate_asks_once_per_session() {
        let mut s = session();
        let mut yes = FixedConfirmer::approve();
        let mut view = ViewState::with_selection([id(3)]);
        s.disaggregate(&mut view, &mut yes).unwrap();
        let mut view = ViewState::with_selection([id(4)]);
        s.remove_nodes(&mut view, &mut yes).unwrap();
        assert_eq!(yes.asked(), 1);
        assert!(s.gate_granted());
    }

    #[test]
    fn confirm_disabled_never_asks() {
        let options = SessionOptions {
            confirm_edits: false,
            ..Default::default()
        };
        let mut s = EditSession::new(AssemblyTree::new(id(1), "root"), options);
        let mut no = FixedConfirmer::decline();
        let mut view = ViewState::with_selection([id(1)]);
        assert!(s.disaggregate(&mut view, &mut no).is_ok());
        assert_eq!(no.asked(), 0);
    }

    #[test]
    fn structural_edit_clears_view() {
        let mut s = session();
        let mut yes = FixedConfirmer::approve();
        let mut view = ViewState::with_selection([id(2)]);
        view.checked.toggle(id(4));
        s.add_node(&mut view, &mut yes).unwrap();
        assert!(view.selected.is_empty());
        assert!(view.checked.is_empty());
        assert!(s.lattice().graph().selected().is_empty());
        assert_eq!(s.lattice().graph().vertices().len(), s.tree().len());
    }

    #[test]
    fn add_under_part_is_invalid_parent() {
        let mut s = session();
        let mut yes = FixedConfirmer::approve();
        let mut view = ViewState::with_selection([id(3)]);
        assert_eq!(
            s.add_node(&mut view, &mut yes),
            Err(EditError::InvalidParent(id(3)))
        );
    }

    #[test]
    fn assemble_uses_configured_label() {
        let options = SessionOptions {
            new_assembly_label: "Group".to_string(),
            ..Default::default()
        };
        let mut tree = AssemblyTree::new(id(1), "root");
        tree.create_node(id(1), "a").unwrap();
        tree.create_node(id(1), "b").unwrap();
        let mut s = EditSession::new(tree, options);
        let mut view = ViewState::with_selection([id(2), id(3)]);
        let new = s
            .assemble(&mut view, &mut FixedConfirmer::approve())
            .unwrap();
        assert_eq!(s.tree().tag(new), Some("Group"));
    }

    #[test]
    fn assemble_beside_shallowest_node() {
        let mut s = session();
        let mut view = ViewState::with_selection([id(4), id(3)]);
        let new = s
            .assemble(&mut view, &mut FixedConfirmer::approve())
            .unwrap();
        assert_eq!(s.tree().parent_of(new), Some(id(1)));
        assert_eq!(s.tree().children_of(new), &[id(3), id(4)]);
        assert_eq!(s.tree().children_of(id(2)), &[id(5)]);
    }

    #[test]
    fn reparent_rejects_root_and_cycles() {
        let mut s = session();
        let mut yes = FixedConfirmer::approve();
        let mut view = ViewState::new();
        assert_eq!(
            s.reparent(id(1), id(3), &mut view, &mut yes),
            Err(EditError::RootViolation(id(1)))
        );
        // dropping a onto its own child would put a under itself
        assert_eq!(
            s.reparent(id(2), id(5), &mut view, &mut yes),
            Err(EditError::DescendantViolation {
                node: id(2),
                target: id(2)
            })
        );
        assert_eq!(yes.asked(), 0);
    }

    #[test]
    fn reparent_to_other_branch() {
        let mut s = session();
        let mut view = ViewState::with_selection([id(4)]);
        let outcome = s
            .reparent(id(3), id(4), &mut view, &mut FixedConfirmer::approve())
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Moved { parent: id(2) });
        assert_eq!(s.tree().children_of(id(2)), &[id(3), id(4), id(5)]);
        assert!(view.selected.is_empty());
    }

    #[test]
    fn drop_on_root_is_rejected_before_prompting() {
        let mut s = session();
        let mut view = ViewState::new();
        let mut confirmer = FixedConfirmer::approve();
        assert_eq!(
            s.reparent(id(5), id(1), &mut view, &mut confirmer),
            Err(EditError::RootViolation(id(1)))
        );
        assert_eq!(s.tree().parent_of(id(5)), Some(id(2)));
        assert_eq!(confirmer.asked(), 0);
    }

    #[test]
    fn sibling_drop_reorders_and_keeps_selection() {
        let mut s = session();
        let mut view = ViewState::with_selection([id(4)]);
        let outcome = s
            .reparent(id(5), id(4), &mut view, &mut FixedConfirmer::approve())
            .unwrap();
        assert_eq!(outcome, MoveOutcome::Reordered { parent: id(2) });
        assert_eq!(s.tree().children_of(id(2)), &[id(5), id(4)]);
        assert_eq!(s.ordering().mode, SortMode::Identity);
        assert_eq!(view.selected.as_slice(), &[id(4)]);
    }

    #[test]
    fn sibling_drop_respects_descending() {
        let mut s = session();
        let mut view = ViewState::with_selection([id(2)]);
        s.toggle_sort_direction(&view).unwrap();
        // descending alphabetical: d, c
        assert_eq!(s.tree().children_of(id(2)), &[id(5), id(4)]);
        s.reparent(id(4), id(5), &mut view, &mut FixedConfirmer::approve())
            .unwrap();
        assert_eq!(s.tree().children_of(id(2)), &[id(4), id(5)]);
    }

    #[test]
    fn rename_keeps_selection_and_relabels() {
        let mut s = session();
        let view = ViewState::with_selection([id(3)]);
        let mut yes = FixedConfirmer::approve();
        s.rename(id(3), "Axle", &view, &mut yes).unwrap();
        assert_eq!(s.tree().tag(id(3)), Some("Axle"));
        assert_eq!(s.tree().children_of(id(1)), &[id(3), id(2)]);
        assert_eq!(s.lattice().graph().vertex(id(3)).unwrap().label, "Axle");
        assert!(s.lattice().graph().selected().contains(&id(3)));
        assert_eq!(yes.asked(), 1);
    }

    #[test]
    fn sort_tools_need_one_node_with_children() {
        let mut s = session();
        let view = ViewState::with_selection([id(3)]);
        assert!(matches!(
            s.toggle_sort_mode(&view),
            Err(EditError::InvalidSelection(_))
        ));
        let view = ViewState::with_selection([id(2), id(3)]);
        assert!(matches!(
            s.sort_alphabetical(&view),
            Err(EditError::InvalidSelection(_))
        ));
    }

    #[test]
    fn sort_by_identity_resets_manual_order() {
        let mut s = session();
        let mut view = ViewState::with_selection([id(2)]);
        let mut yes = FixedConfirmer::approve();
        s.reparent(id(5), id(4), &mut view, &mut yes).unwrap();
        assert_eq!(s.tree().children_of(id(2)), &[id(5), id(4)]);
        s.sort_by_identity(&view).unwrap();
        assert_eq!(s.tree().children_of(id(2)), &[id(4), id(5)]);
        assert_eq!(s.tree().get(id(5)).unwrap().sort_key(), 5);
    }

    #[test]
    fn pick_toggles_selection() {
        let mut s = session();
        let mut view = ViewState::new();
        let (picked, selected) = s.pick(&mut view, 0.0, 0.0).unwrap();
        assert_eq!(picked, id(1));
        assert!(selected);
        assert_eq!(s.lattice().graph().vertex(id(1)).unwrap().colour, "blue");
        let (_, selected) = s.pick(&mut view, 0.0, 0.0).unwrap();
        assert!(!selected);
        assert!(view.selected.is_empty());
    }

    #[test]
    fn select_with_unknown_id_changes_nothing() {
        let mut s = session();
        let mut view = ViewState::with_selection([id(3)]);
        assert!(matches!(
            s.select(&mut view, &[id(4), id(99)]),
            Err(EditError::InvalidSelection(_))
        ));
        assert_eq!(view.selected.as_slice(), &[id(3)]);
        assert_eq!(s.lattice().graph().selected().len(), 0);

        assert_eq!(s.select(&mut view, &[id(4), id(3), id(5)]), Ok(2));
        assert_eq!(view.selected.as_slice(), &[id(3), id(4), id(5)]);
        assert_eq!(s.lattice().graph().selected().len(), 3);
    }

    #[test]
    fn checked_set_rejects_unknown() {
        let s = session();
        let mut view = ViewState::new();
        assert_eq!(s.toggle_checked(&mut view, id(4)), Ok(true));
        assert!(s.toggle_checked(&mut view, id(99)).is_err());
    }

    #[test]
    fn operations_follow_selection() {
        let s = session();
        assert!(s.available_operations(&ViewState::new()).is_empty());

        let ops = s.available_operations(&ViewState::with_selection([id(3)]));
        assert_eq!(ops, vec![Operation::Disaggregate, Operation::RemoveNode]);

        let ops = s.available_operations(&ViewState::with_selection([id(2)]));
        assert!(ops.contains(&Operation::Flatten));
        assert!(ops.contains(&Operation::SortByIdentity));
        assert!(!ops.contains(&Operation::Disaggregate));

        let ops = s.available_operations(&ViewState::with_selection([id(1)]));
        assert!(!ops.contains(&Operation::RemoveNode));

        let ops = s.available_operations(&ViewState::with_selection([id(3), id(4)]));
        assert_eq!(ops, vec![Operation::Assemble, Operation::RemoveNode]);

        let ops = s.available_operations(&ViewState::with_selection([id(1), id(4)]));
        assert!(ops.is_empty());
    }
}
