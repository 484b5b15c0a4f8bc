//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`prompts`] - Interactive confirmation
//! - [`output`] - Output formatting and display
//! - [`render`] - Text rendering of trees and lattices
//!
//! # Design
//!
//! All output and prompts go through this module to ensure consistent
//! formatting and proper handling of interactive vs non-interactive modes.
//! The renderers take read-only snapshots; nothing here mutates a tree.

pub mod output;
pub mod prompts;
pub mod render;
