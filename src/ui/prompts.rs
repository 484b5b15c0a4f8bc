//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::engine::Confirmer;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Ask a yes/no question on `output`, reading the answer from `input`.
///
/// An empty answer takes `default`. Unrecognised answers ask again. End of
/// input is `Cancelled`.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
    default: bool,
) -> Result<bool, PromptError> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        write!(output, "{} {} ", message, hint).map_err(|e| PromptError::IoError(e.to_string()))?;
        output
            .flush()
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| PromptError::IoError(e.to_string()))?;
        if read == 0 {
            return Err(PromptError::Cancelled);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

/// Prompt for confirmation (yes/no) on the terminal.
///
/// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
/// Returns `Err(PromptError::NotInteractive)` if not in interactive mode.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let stdin = io::stdin();
    let mut input = stdin.lock();
    confirm_with(&mut input, &mut io::stderr(), message, default)
}

/// Confirms edits by asking on the terminal.
///
/// Anything other than an explicit yes declines, including running
/// non-interactively.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirmer {
    interactive: bool,
}

impl TerminalConfirmer {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl Confirmer for TerminalConfirmer {
    fn ask(&mut self, message: &str) -> bool {
        match confirm(message, false, self.interactive) {
            Ok(answer) => answer,
            Err(PromptError::NotInteractive) => {
                tracing::warn!("edit needs confirmation but input is not interactive");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "confirmation prompt failed");
                false
            }
        }
    }
}
