//! # board
//!
//! why: one immutable 3x3 position, the unit stored in the move history
//! relations: used by rules.rs for derived state, engine.rs for history
//! what: Mark, Cell, Board, WINNING_LINES

use std::fmt;

use serde::{Deserialize, Serialize};

/// number of cells on the board
pub const CELL_COUNT: usize = 9;

/// winning line indices, checked in this order: rows, columns, diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// A player's symbol. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single square. Stored as `null` or the mark string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<Mark>", into = "Option<Mark>")]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(mark: Option<Mark>) -> Self {
        mark.map_or(Cell::Empty, Cell::Marked)
    }
}

impl From<Cell> for Option<Mark> {
    fn from(cell: Cell) -> Self {
        cell.mark()
    }
}

/// One board snapshot. Moves produce new boards, existing ones never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// the starting position
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// cell at `index`, `None` past the last square
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Marked(mark)).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// copy of this board with `mark` placed at `index`
    ///
    /// callers check bounds and emptiness first
    pub(crate) fn with_mark(&self, index: usize, mark: Mark) -> Board {
        let mut cells = self.cells;
        cells[index] = Cell::Marked(mark);
        Board { cells }
    }

    /// indices that differ between two boards
    pub fn diff(&self, other: &Board) -> Vec<usize> {
        (0..CELL_COUNT)
            .filter(|&i| self.cells[i] != other.cells[i])
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                let ch = cell.mark().map_or('.', Mark::as_char);
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}
