//! engine
//!
//! Edit operations over a loaded assembly.
//!
//! # Architecture
//!
//! The engine owns the tree and its lattice projection for the lifetime of
//! one loaded assembly. Callers hold the view-side state (selection and
//! checked sets) and a [`Confirmer`], and pass both into every operation:
//!
//! ```text
//! Validate -> Gate -> Mutate -> Refresh
//! ```
//!
//! # Modules
//!
//! - [`session`] - The edit operations
//! - [`selection`] - Selection and checked sets
//! - [`confirm`] - Once-per-session confirmation gate
//! - [`error`] - Edit failure taxonomy
//!
//! # Invariants
//!
//! - Validation happens before the gate, the gate before any mutation
//! - A failed operation leaves the tree unchanged
//! - After every structural edit the lattice is rebuilt from the tree
//!
//! # Example
//!
//! ```
//! use assembly_lattice::core::tree::AssemblyTree;
//! use assembly_lattice::core::types::NodeId;
//! use assembly_lattice::engine::{EditSession, FixedConfirmer, SessionOptions, ViewState};
//!
//! let mut tree = AssemblyTree::new(NodeId::new(1), "root");
//! let a = tree.create_node(tree.root(), "A").unwrap();
//! let b = tree.create_node(tree.root(), "B").unwrap();
//!
//! let mut session = EditSession::new(tree, SessionOptions::default());
//! let mut view = ViewState::with_selection([a, b]);
//! let group = session
//!     .assemble(&mut view, &mut FixedConfirmer::approve())
//!     .unwrap();
//!
//! assert_eq!(session.tree().children_of(group), &[a, b]);
//! assert!(view.selected.is_empty());
//! ```

pub mod confirm;
pub mod error;
pub mod selection;
pub mod session;

pub use confirm::{ConfirmGate, Confirmer, FixedConfirmer};
pub use error::EditError;
pub use selection::{CheckedSet, SelectionSet, ViewState};
pub use session::{EditSession, FlattenReport, MoveOutcome, Operation, SessionOptions};

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive mode enabled.
    pub interactive: bool,
    /// Edits are pre-approved; the session never prompts.
    pub assume_yes: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            debug: false,
            quiet: false,
            interactive: true,
            assume_yes: false,
        }
    }
}
