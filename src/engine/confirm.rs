//! engine::confirm
//!
//! The once-per-session confirmation gate.
//!
//! The first edit of a session asks a [`Confirmer`] before anything is
//! changed. Once granted, the gate stays open for the rest of the session.
//! A declined prompt leaves the gate closed, so the next edit asks again.

use super::error::EditError;

/// Asks the operator to approve an edit.
pub trait Confirmer {
    /// Synchronous yes/no question.
    fn ask(&mut self, message: &str) -> bool;
}

/// A confirmer that always gives the same answer and counts the questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedConfirmer {
    answer: bool,
    asked: usize,
}

impl FixedConfirmer {
    /// Approve everything.
    pub fn approve() -> Self {
        Self {
            answer: true,
            asked: 0,
        }
    }

    /// Decline everything.
    pub fn decline() -> Self {
        Self {
            answer: false,
            asked: 0,
        }
    }

    /// How many times [`Confirmer::ask`] was called.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Confirmer for FixedConfirmer {
    fn ask(&mut self, _message: &str) -> bool {
        self.asked += 1;
        self.answer
    }
}

/// Session-wide "changes approved" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmGate {
    granted: bool,
}

impl ConfirmGate {
    /// A gate that asks before the first edit when `require` is true, and
    /// never asks otherwise.
    pub fn new(require: bool) -> Self {
        Self { granted: !require }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Pass the gate, asking `confirmer` if it has not been granted yet.
    ///
    /// # Errors
    ///
    /// `Cancelled` if the confirmer declines.
    pub fn pass(&mut self, confirmer: &mut dyn Confirmer) -> Result<(), EditError> {
        if self.granted {
            return Ok(());
        }
        if confirmer.ask("This will change the assembly structure. Continue?") {
            tracing::debug!("edit gate granted for this session");
            self.granted = true;
            Ok(())
        } else {
            Err(EditError::Cancelled)
        }
    }
}
