//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration for the assembly's directory
//! 2. Loads the assembly through the parser
//! 3. Drives the engine and formats the result
//!
//! Handlers do NOT mutate trees directly.

mod completion;
mod config_cmd;
mod edit;
mod lattice_cmd;
mod show;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use edit::{edit, SessionCommand};
pub use lattice_cmd::lattice;
pub use show::show;

use std::path::Path;

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::core::tree::AssemblyTree;
use crate::engine::Context;
use crate::parser::{build_initial_tree, AssemblyParser, DocumentParser};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Show { file } => show::show(ctx, &file),
        Command::Lattice { file, json } => lattice_cmd::lattice(ctx, &file, json),
        Command::Edit { file, commands } => edit::edit(ctx, &file, &commands),
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_cmd::get(ctx, &key),
            ConfigAction::Set { key, value } => config_cmd::set(ctx, &key, &value),
            ConfigAction::List => config_cmd::list(ctx),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Load configuration for the directory holding `file`, reporting warnings.
pub(crate) fn load_config_for(ctx: &Context, file: &Path) -> Result<Config> {
    let dir = file.parent().filter(|d| !d.as_os_str().is_empty());
    let loaded = Config::load(dir).context("Failed to load config")?;
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    Ok(loaded.config)
}

/// Parse `file` and build its sorted tree.
pub(crate) fn load_tree(file: &Path, config: &Config) -> Result<AssemblyTree> {
    let raw = DocumentParser
        .load(file)
        .with_context(|| format!("Failed to load assembly '{}'", file.display()))?;
    build_initial_tree(&raw, &config.sort_ordering())
        .with_context(|| format!("Invalid assembly '{}'", file.display()))
}
