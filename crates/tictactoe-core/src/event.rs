//! # event
//!
//! why: hosts re-render when the game changes instead of polling
//! relations: engine.rs notifies after every applied mutation
//! what: GameSnapshot, SubscriptionId, Subscribers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::rules::GameStatus;

/// What a subscriber sees after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub current_step: usize,
    pub history_len: usize,
    pub status: GameStatus,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&GameSnapshot)>;

/// Registered change callbacks, called in subscription order
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub(crate) fn notify(&mut self, snapshot: &GameSnapshot) {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(snapshot);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.callbacks.len())
            .finish()
    }
}
