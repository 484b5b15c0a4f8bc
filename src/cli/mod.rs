//! cli
//!
//! Command-line interface layer for asml.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT mutate trees directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! command handlers, which drive an [`crate::engine::EditSession`] and
//! render its snapshots through [`crate::ui`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::core::config::Config;
use crate::engine;
use anyhow::Result;

/// Run the CLI application with already-parsed arguments.
///
/// Called from `main.rs` once logging is set up.
pub fn run(cli: Cli) -> Result<()> {
    // A broken config file is reported by the command that needs it.
    let configured_interactive = Config::load(None)
        .map(|r| r.config.interactive())
        .unwrap_or(true);

    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(configured_interactive),
        assume_yes: cli.yes,
    };

    commands::dispatch(cli.command, &ctx)
}
