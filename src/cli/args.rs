//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output
//! - `--yes` / `-y`: Pre-approve edits

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// asml - Restructure part/assembly trees and view them as a lattice
#[derive(Parser, Debug)]
#[command(name = "asml")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(
        long = "interactive",
        global = true,
        conflicts_with = "no_interactive"
    )]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    /// Approve edits up front instead of asking before the first one
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set, the configured
    ///   default allows it, AND stdin is a TTY
    pub fn interactive(&self, configured: bool) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            configured && std::io::stdin().is_terminal()
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print an assembly as an indented tree
    #[command(
        name = "show",
        long_about = "Print an assembly as an indented tree.\n\n\
            Loads the assembly description, orders every node's children with the \
            configured sort mode, and prints one line per node with its id and kind.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Inspect an assembly before editing it
    asml show bicycle.json"
    )]
    Show {
        /// Assembly description (.json or .toml)
        file: PathBuf,
    },

    /// Print the lattice projection of an assembly
    #[command(
        name = "lattice",
        long_about = "Print the lattice projection of an assembly.\n\n\
            Every node is placed on the level equal to its depth. Each level lists its \
            vertices with their positions and colours, followed by the parent/child edges.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Human-readable levels and edges
    asml lattice bicycle.json

    # Machine-readable output for a viewer
    asml lattice bicycle.json --json"
    )]
    Lattice {
        /// Assembly description (.json or .toml)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an assembly in a line-oriented session
    #[command(
        name = "edit",
        long_about = "Edit an assembly in a line-oriented session.\n\n\
            Commands are taken from -c arguments, or read from stdin one per line. \
            The first edit of a session asks for confirmation unless --yes is given \
            or confirm_edits is false. Edits live only for the session.\n\n\
            SESSION COMMANDS:\n    \
            select ID...      deselect ID...    clear\n    \
            pick X Y          check ID\n    \
            assemble          flatten           disaggregate\n    \
            aggregate         add               remove\n    \
            move SRC DST      rename ID TEXT\n    \
            sort toggle|reverse|alpha|id\n    \
            tree              lattice           ops\n    \
            help              quit",
        after_help = "\
WORKFLOW EXAMPLES:
    # Group two parts into a new sub-assembly and show the result
    asml edit bicycle.json --yes -c 'select 2 3' -c assemble -c tree

    # Interactive session
    asml edit bicycle.json"
    )]
    Edit {
        /// Assembly description (.json or .toml)
        file: PathBuf,

        /// Session command to run; repeatable. Reads stdin when absent.
        #[arg(short = 'c', long = "command", value_name = "CMD")]
        commands: Vec<String>,
    },

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        long_about = "View or modify asml configuration.\n\n\
            Global configuration lives in ~/.assembly-lattice/config.toml (or $ASML_CONFIG). \
            A .assembly-lattice/config.toml next to an assembly file overrides it for \
            that directory.",
        after_help = "\
WORKFLOW EXAMPLES:
    # List all configuration values
    asml config list

    # Get a specific value
    asml config get sort.mode

    # Set a value
    asml config set labels.new_part 'New part'"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for asml commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    asml completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    asml completion zsh >> ~/.zshrc

    # Fish
    asml completion fish > ~/.config/fish/completions/asml.fish

    # PowerShell
    asml completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_commands() {
        let cli = Cli::try_parse_from([
            "asml", "edit", "a.json", "-c", "select 2 3", "-c", "assemble", "--yes",
        ])
        .unwrap();
        assert!(cli.yes);
        match cli.command {
            Command::Edit { file, commands } => {
                assert_eq!(file, PathBuf::from("a.json"));
                assert_eq!(commands, vec!["select 2 3", "assemble"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn interactive_flags() {
        let cli = Cli::try_parse_from(["asml", "--interactive", "show", "a.json"]).unwrap();
        assert!(cli.interactive(false));

        let cli = Cli::try_parse_from(["asml", "--no-interactive", "show", "a.json"]).unwrap();
        assert!(!cli.interactive(true));

        let cli = Cli::try_parse_from(["asml", "-q", "show", "a.json"]).unwrap();
        assert!(!cli.interactive(true));

        let cli = Cli::try_parse_from(["asml", "show", "a.json"]).unwrap();
        assert!(!cli.interactive(false));
    }

    #[test]
    fn interactive_conflicts() {
        assert!(
            Cli::try_parse_from(["asml", "--interactive", "--no-interactive", "show", "a"])
                .is_err()
        );
    }
}
