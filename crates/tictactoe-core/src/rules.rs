//! # rules
//!
//! why: derive turn, winner and status from a single board
//! relations: pure functions used by engine.rs on every query
//! what: next_mark, winner, status, GameStatus

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Mark, WINNING_LINES};

/// Where a game stands, derived from the board alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No winner and at least one empty cell
    InProgress { next: Mark },
    /// Three in a row
    Won(Mark),
    /// Board full, no winner
    Draw,
}

impl GameStatus {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, GameStatus::InProgress { .. })
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Won(mark) => write!(f, "Winner: {}", mark),
            GameStatus::Draw => f.write_str("Scratch: Cat's game"),
            GameStatus::InProgress { next } => write!(f, "Next player: {}", next),
        }
    }
}

/// X moves when both marks have been played equally often, O otherwise
pub fn next_mark(board: &Board) -> Mark {
    if board.count(Mark::X) == board.count(Mark::O) {
        Mark::X
    } else {
        Mark::O
    }
}

/// first completed line in [`WINNING_LINES`] order
pub fn winner(board: &Board) -> Option<Mark> {
    let cells = board.cells();
    WINNING_LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Cell::Marked(mark) if cells[b] == cells[a] && cells[c] == cells[a] => Some(mark),
        _ => None,
    })
}

pub fn status(winner: Option<Mark>, board: &Board, next: Mark) -> GameStatus {
    match winner {
        Some(mark) => GameStatus::Won(mark),
        None if board.is_full() => GameStatus::Draw,
        None => GameStatus::InProgress { next },
    }
}

/// status of `board` with winner and turn computed from it
pub fn evaluate(board: &Board) -> GameStatus {
    status(winner(board), board, next_mark(board))
}
