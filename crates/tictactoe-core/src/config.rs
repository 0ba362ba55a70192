//! # config
//!
//! why: let hosts choose where a game's state lives in shared storage
//! relations: consumed by GameEngine::open
//! what: GameConfig

use serde::{Deserialize, Serialize};

/// Storage keys for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// key holding the list of board snapshots
    pub history_key: String,
    /// key holding the index of the active snapshot
    pub step_key: String,
}

impl GameConfig {
    pub const DEFAULT_NAMESPACE: &'static str = "tic-tac-toe";

    /// keys `<namespace>:history` and `<namespace>:steps`
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            history_key: format!("{}:history", namespace),
            step_key: format!("{}:steps", namespace),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_namespace(Self::DEFAULT_NAMESPACE)
    }
}
