//! Error types for game operations

use thiserror::Error;
use tictactoe_storage::StorageError;

/// Errors returned by [`GameEngine`](crate::GameEngine).
///
/// Illegal moves are not errors, see [`MoveOutcome`](crate::MoveOutcome).
#[derive(Error, Debug)]
pub enum GameError {
    /// Loading or persisting game state failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Requested step is not in the history
    #[error("step {step} is out of range (history has {len} entries)")]
    StepOutOfRange { step: usize, len: usize },

    /// Stored state decoded but breaks the history invariants
    #[error("corrupt game state: {0}")]
    CorruptState(String),
}

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;
