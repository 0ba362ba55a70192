//! # tictactoe-core
//!
//! why: a turn-based 3x3 game whose move history survives restarts
//! relations: persists history and current step via tictactoe-storage
//! what: board model, derived game status, GameEngine with time travel

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod moves;
pub mod rules;

pub use board::{Board, Cell, Mark, CELL_COUNT, WINNING_LINES};
pub use config::GameConfig;
pub use engine::GameEngine;
pub use error::{GameError, Result};
pub use event::{GameSnapshot, SubscriptionId};
pub use moves::{MoveEntry, MoveOutcome, Rejection};
pub use rules::GameStatus;
