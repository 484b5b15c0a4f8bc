//! edit command - Line-oriented editing session
//!
//! Each line is one [`SessionCommand`]. Failed edits are reported and the
//! session carries on with the tree unchanged.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use crate::core::types::NodeId;
use crate::engine::{
    Confirmer, Context, EditError, EditSession, FixedConfirmer, MoveOutcome, SessionOptions,
    ViewState,
};
use crate::parser::DocumentParser;
use crate::ui::output::{self, format_ids, Verbosity};
use crate::ui::prompts::TerminalConfirmer;
use crate::ui::render::{render_lattice, render_tree};
use anyhow::{anyhow, bail, Context as _, Result};

/// Sort tool named by `sort ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortTool {
    Toggle,
    Reverse,
    Alpha,
    Identity,
}

/// One parsed session line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Select(Vec<NodeId>),
    Deselect(Vec<NodeId>),
    Clear,
    Pick { x: f64, y: f64 },
    Check(NodeId),
    Assemble,
    Flatten,
    Disaggregate,
    Aggregate,
    Add,
    Remove,
    Move { source: NodeId, destination: NodeId },
    Rename { id: NodeId, text: String },
    Sort(SortTool),
    Tree,
    Lattice,
    Ops,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  select ID...      add nodes to the selection
  deselect ID...    drop nodes from the selection
  clear             empty the selection
  pick X Y          toggle the lattice node nearest to (X, Y)
  check ID          toggle a node in the checked set
  assemble          group the selection under a new assembly
  flatten           pull all parts of the selected assembly up to it
  disaggregate      split the selected part in two
  aggregate         collapse the selected assembly's children
  add               add a part under the selected assembly
  remove            remove the selected nodes
  move SRC DST      drop SRC onto DST
  rename ID TEXT    change a label
  sort toggle|reverse|alpha|id
  tree              print the tree
  lattice           print the lattice
  ops               list operations for the selection
  quit              end the session";

impl SessionCommand {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let no_args = |cmd: SessionCommand| -> Result<Option<SessionCommand>> {
            if args.is_empty() {
                Ok(Some(cmd))
            } else {
                bail!("'{}' takes no arguments", word)
            }
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "select" | "sel" => SessionCommand::Select(parse_ids(word, &args)?),
            "deselect" => SessionCommand::Deselect(parse_ids(word, &args)?),
            "clear" => return no_args(SessionCommand::Clear),
            "pick" => match args.as_slice() {
                [x, y] => SessionCommand::Pick {
                    x: parse_coord(x)?,
                    y: parse_coord(y)?,
                },
                _ => bail!("usage: pick X Y"),
            },
            "check" => match args.as_slice() {
                [id] => SessionCommand::Check(parse_id(id)?),
                _ => bail!("usage: check ID"),
            },
            "assemble" => return no_args(SessionCommand::Assemble),
            "flatten" => return no_args(SessionCommand::Flatten),
            "disaggregate" => return no_args(SessionCommand::Disaggregate),
            "aggregate" => return no_args(SessionCommand::Aggregate),
            "add" => return no_args(SessionCommand::Add),
            "remove" | "rm" => return no_args(SessionCommand::Remove),
            "move" | "mv" => match args.as_slice() {
                [source, destination] => SessionCommand::Move {
                    source: parse_id(source)?,
                    destination: parse_id(destination)?,
                },
                _ => bail!("usage: move SRC DST"),
            },
            "rename" => {
                let (id, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: rename ID TEXT"))?;
                SessionCommand::Rename {
                    id: parse_id(id)?,
                    text: text.trim().to_string(),
                }
            }
            "sort" => match args.as_slice() {
                ["toggle"] | ["mode"] => SessionCommand::Sort(SortTool::Toggle),
                ["reverse"] | ["direction"] => SessionCommand::Sort(SortTool::Reverse),
                ["alpha"] => SessionCommand::Sort(SortTool::Alpha),
                ["id"] => SessionCommand::Sort(SortTool::Identity),
                _ => bail!("usage: sort toggle|reverse|alpha|id"),
            },
            "tree" => return no_args(SessionCommand::Tree),
            "lattice" => return no_args(SessionCommand::Lattice),
            "ops" => return no_args(SessionCommand::Ops),
            "help" | "?" => return no_args(SessionCommand::Help),
            "quit" | "exit" => return no_args(SessionCommand::Quit),
            other => bail!("unknown command '{}' (try 'help')", other),
        };
        Ok(Some(command))
    }
}

fn parse_id(text: &str) -> Result<NodeId> {
    text.parse()
        .map_err(|_| anyhow!("'{}' is not a node id", text))
}

fn parse_ids(word: &str, args: &[&str]) -> Result<Vec<NodeId>> {
    if args.is_empty() {
        bail!("usage: {} ID...", word);
    }
    args.iter().map(|a| parse_id(a)).collect()
}

fn parse_coord(text: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => bail!("'{}' is not a coordinate", text),
    }
}

/// Whether the session keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// An editing session bound to its view state and confirmer.
struct Editor<'a> {
    session: EditSession,
    view: ViewState,
    confirmer: &'a mut dyn Confirmer,
    verbosity: Verbosity,
}

impl Editor<'_> {
    fn say(&self, message: impl std::fmt::Display) {
        output::print(message, self.verbosity);
    }

    fn execute(&mut self, command: SessionCommand) -> Result<Flow, EditError> {
        tracing::debug!(?command, "session command");
        match command {
            SessionCommand::Select(ids) => {
                self.session.select(&mut self.view, &ids)?;
                self.say(format!("selected: {}", format_ids(self.view.selected.as_slice())));
            }
            SessionCommand::Deselect(ids) => {
                for id in ids {
                    self.session.deselect(&mut self.view, id);
                }
                self.say(format!("selected: {}", format_ids(self.view.selected.as_slice())));
            }
            SessionCommand::Clear => {
                self.session.clear_selection(&mut self.view);
                self.say("selection cleared");
            }
            SessionCommand::Pick { x, y } => match self.session.pick(&mut self.view, x, y) {
                Some((id, true)) => self.say(format!("picked {} (selected)", id)),
                Some((id, false)) => self.say(format!("picked {} (deselected)", id)),
                None => self.say("nothing to pick"),
            },
            SessionCommand::Check(id) => {
                let checked = self.session.toggle_checked(&mut self.view, id)?;
                self.say(format!(
                    "{} {}",
                    id,
                    if checked { "checked" } else { "unchecked" }
                ));
            }
            SessionCommand::Assemble => {
                let members = self.view.selected.as_slice().to_vec();
                let new = self.session.assemble(&mut self.view, self.confirmer)?;
                self.say(format!("assembled {} into {}", format_ids(&members), new));
            }
            SessionCommand::Flatten => {
                let target = self.view.selected.as_slice().to_vec();
                let report = self.session.flatten(&mut self.view, self.confirmer)?;
                self.say(format!(
                    "flattened {}: promoted [{}], removed [{}]",
                    format_ids(&target),
                    format_ids(&report.promoted),
                    format_ids(&report.removed)
                ));
            }
            SessionCommand::Disaggregate => {
                let target = self.view.selected.as_slice().to_vec();
                let [a, b] = self.session.disaggregate(&mut self.view, self.confirmer)?;
                self.say(format!("split {} into {}, {}", format_ids(&target), a, b));
            }
            SessionCommand::Aggregate => {
                let target = self.view.selected.as_slice().to_vec();
                let history = self.session.aggregate(&mut self.view, self.confirmer)?;
                self.say(format!(
                    "aggregated {}: history [{}]",
                    format_ids(&target),
                    format_ids(&history)
                ));
            }
            SessionCommand::Add => {
                let parent = self.view.selected.as_slice().to_vec();
                let id = self.session.add_node(&mut self.view, self.confirmer)?;
                self.say(format!("added {} under {}", id, format_ids(&parent)));
            }
            SessionCommand::Remove => {
                let removed = self.session.remove_nodes(&mut self.view, self.confirmer)?;
                self.say(format!("removed {}", format_ids(&removed)));
            }
            SessionCommand::Move {
                source,
                destination,
            } => match self
                .session
                .reparent(source, destination, &mut self.view, self.confirmer)?
            {
                MoveOutcome::Reordered { parent } => {
                    self.say(format!("moved {} before {} under {}", source, destination, parent))
                }
                MoveOutcome::Moved { parent } => {
                    self.say(format!("moved {} under {}", source, parent))
                }
            },
            SessionCommand::Rename { id, text } => {
                self.session
                    .rename(id, &text, &self.view, self.confirmer)?;
                self.say(format!("renamed {} to '{}'", id, text));
            }
            SessionCommand::Sort(tool) => {
                let message = match tool {
                    SortTool::Toggle => {
                        format!("sort mode: {}", self.session.toggle_sort_mode(&self.view)?.as_str())
                    }
                    SortTool::Reverse => format!(
                        "sort direction: {}",
                        self.session.toggle_sort_direction(&self.view)?.as_str()
                    ),
                    SortTool::Alpha => {
                        self.session.sort_alphabetical(&self.view)?;
                        "sorted alphabetically".to_string()
                    }
                    SortTool::Identity => {
                        self.session.sort_by_identity(&self.view)?;
                        "sorted by id".to_string()
                    }
                };
                self.say(message);
            }
            SessionCommand::Tree => print!("{}", render_tree(self.session.tree(), Some(&self.view))),
            SessionCommand::Lattice => print!("{}", render_lattice(self.session.lattice())),
            SessionCommand::Ops => {
                let ops = self.session.available_operations(&self.view);
                if ops.is_empty() {
                    println!("(no operations for the current selection)");
                } else {
                    println!("{}", output::format_list(&ops, ""));
                }
            }
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Parse and run one line, reporting failures.
    fn run_line(&mut self, line: &str) -> Flow {
        let command = match SessionCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                output::error(e);
                return Flow::Continue;
            }
        };
        match self.execute(command) {
            Ok(flow) => flow,
            Err(e) => {
                output::error(e);
                Flow::Continue
            }
        }
    }
}

/// Run an editing session over `file`.
///
/// `commands` are run in order; with none, commands are read from stdin.
pub fn edit(ctx: &Context, file: &Path, commands: &[String]) -> Result<()> {
    let config = super::load_config_for(ctx, file)?;
    let mut options = SessionOptions::from_config(&config);
    if ctx.assume_yes {
        options.confirm_edits = false;
    }

    let session = EditSession::open(&DocumentParser, file, options)
        .with_context(|| format!("Failed to open assembly '{}'", file.display()))?;
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    output::status(
        format!("editing {} ({} nodes)", file.display(), session.tree().len()),
        verbosity,
    );

    let mut terminal = TerminalConfirmer::new(ctx.interactive);
    let mut declined = FixedConfirmer::decline();
    // Commands come from stdin when none are given, so stdin cannot also
    // answer prompts unless it is a terminal.
    let confirmer: &mut dyn Confirmer = if commands.is_empty() && !io::stdin().is_terminal() {
        &mut declined
    } else {
        &mut terminal
    };

    let mut editor = Editor {
        session,
        view: ViewState::new(),
        confirmer,
        verbosity,
    };

    if !commands.is_empty() {
        for line in commands {
            if editor.run_line(line) == Flow::Quit {
                break;
            }
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let prompt = ctx.interactive && stdin.is_terminal();
    loop {
        if prompt {
            eprint!("asml> ");
            io::stderr().flush().ok();
        }
        let mut line = String::new();
        // The lock is released before a confirmation prompt reads stdin.
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read session command")?;
        if read == 0 || editor.run_line(&line) == Flow::Quit {
            break;
        }
    }
    Ok(())
}
