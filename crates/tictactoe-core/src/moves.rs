//! # moves
//!
//! why: describe what a move attempt did and list history entries for display
//! relations: returned by engine.rs
//! what: MoveOutcome, Rejection, MoveEntry

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Mark;

/// Why a square selection was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// the board at the current step already has a winner or is full
    GameOver,
    /// the square already holds a mark
    Occupied,
    /// index is not one of the nine squares
    OutOfBounds,
}

/// Result of `select_square`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// `mark` was placed and `step` is the new current step
    Applied { step: usize, mark: Mark },
    /// nothing changed
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }
}

/// One line of the move list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub step: usize,
    pub label: String,
    pub is_current: bool,
}

impl MoveEntry {
    pub fn new(step: usize, current_step: usize) -> Self {
        let label = if step == 0 {
            "Go to game start".to_string()
        } else {
            format!("Go to move #{}", step)
        };
        Self {
            step,
            label,
            is_current: step == current_step,
        }
    }
}

impl fmt::Display for MoveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)?;
        if self.is_current {
            f.write_str(" (current)")?;
        }
        Ok(())
    }
}
