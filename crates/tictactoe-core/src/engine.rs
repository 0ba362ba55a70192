//! # engine
//!
//! why: own the persisted history and current step, apply moves and time travel
//! relations: uses board.rs and rules.rs, persists through tictactoe-storage
//! what: GameEngine

use tictactoe_storage::{InitialValue, PersistentValue, SharedStorage};
use tracing::{debug, info};

use crate::board::{Board, Cell, Mark};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::event::{GameSnapshot, SubscriptionId, Subscribers};
use crate::moves::{MoveEntry, MoveOutcome, Rejection};
use crate::rules::{self, GameStatus};

/// A tic-tac-toe game with persisted, branch-free history.
///
/// `history[0]` is always the empty board and `current_step` always points
/// into `history`. Turn, winner and status are recomputed from the board at
/// `current_step` on every query.
#[derive(Debug)]
pub struct GameEngine {
    config: GameConfig,
    history: PersistentValue<Vec<Board>>,
    step: PersistentValue<usize>,
    subscribers: Subscribers,
}

impl GameEngine {
    /// Load the game stored under `config`'s keys, or start a new one.
    ///
    /// Undecodable or inconsistent stored state is an error rather than a
    /// silent reset.
    pub fn open(storage: SharedStorage, config: GameConfig) -> Result<Self> {
        let history = PersistentValue::new(
            storage.clone(),
            config.history_key.clone(),
            InitialValue::lazy(|| vec![Board::empty()]),
        )?;
        let step =
            PersistentValue::new(storage, config.step_key.clone(), InitialValue::value(0usize))?;

        check_state(history.get(), *step.get())?;
        info!(
            history_key = %config.history_key,
            moves = history.get().len() - 1,
            step = *step.get(),
            "game loaded"
        );

        Ok(Self {
            config,
            history,
            step,
            subscribers: Subscribers::default(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn history(&self) -> &[Board] {
        self.history.get()
    }

    pub fn current_step(&self) -> usize {
        *self.step.get()
    }

    pub fn current_board(&self) -> Board {
        self.history.get()[self.current_step()]
    }

    pub fn next_mark(&self) -> Mark {
        rules::next_mark(&self.current_board())
    }

    pub fn winner(&self) -> Option<Mark> {
        rules::winner(&self.current_board())
    }

    pub fn status(&self) -> GameStatus {
        rules::evaluate(&self.current_board())
    }

    /// one entry per history step, for jump-to-step controls
    pub fn moves(&self) -> Vec<MoveEntry> {
        let current = self.current_step();
        (0..self.history.get().len())
            .map(|step| MoveEntry::new(step, current))
            .collect()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.current_board(),
            current_step: self.current_step(),
            history_len: self.history.get().len(),
            status: self.status(),
        }
    }

    /// Place the next mark at `index` on the current board.
    ///
    /// Entries after the current step are discarded first. Rejected moves
    /// change nothing and write nothing. The step is only written once the
    /// history write succeeded, so stored step never points past stored history.
    pub fn select_square(&mut self, index: usize) -> Result<MoveOutcome> {
        let board = self.current_board();

        let rejection = match (board.cell(index), self.status()) {
            (None, _) => Some(Rejection::OutOfBounds),
            (Some(_), status) if !status.is_in_progress() => Some(Rejection::GameOver),
            (Some(cell), _) if !cell.is_empty() => Some(Rejection::Occupied),
            _ => None,
        };
        if let Some(reason) = rejection {
            debug!(index, ?reason, "move rejected");
            return Ok(MoveOutcome::Rejected(reason));
        }

        let step = self.current_step();
        let mark = rules::next_mark(&board);
        let next_board = board.with_mark(index, mark);

        let saved = self
            .history
            .update(|history| {
                history.truncate(step + 1);
                history.push(next_board);
            })
            .and_then(|()| self.step.set(step + 1));
        if saved.is_err() {
            self.step.set_in_memory(step + 1);
        }

        debug!(index, %mark, step = step + 1, "move applied");
        self.notify();

        saved?;
        Ok(MoveOutcome::Applied { step: step + 1, mark })
    }

    /// Make `step` the current step without touching the history.
    pub fn jump_to_step(&mut self, step: usize) -> Result<()> {
        let len = self.history.get().len();
        if step >= len {
            return Err(GameError::StepOutOfRange { step, len });
        }

        let saved = self.step.set(step);
        debug!(step, "jumped to step");
        self.notify();

        saved?;
        Ok(())
    }

    /// Discard every move and go back to the empty board.
    ///
    /// Step 0 is valid for any stored history, so it is written first and the
    /// history only after it.
    pub fn restart(&mut self) -> Result<()> {
        let saved = self.step.set(0);
        let saved = match saved {
            Ok(()) => self.history.set(vec![Board::empty()]),
            Err(e) => {
                self.history.set_in_memory(vec![Board::empty()]);
                Err(e)
            }
        };
        debug!("game restarted");
        self.notify();

        saved?;
        Ok(())
    }

    /// Call `callback` after every applied change.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&GameSnapshot) + 'static,
    ) -> SubscriptionId {
        self.subscribers.add(Box::new(callback))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers.notify(&snapshot);
    }
}

/// stored history must start empty, grow one alternating mark at a time,
/// and contain the step
fn check_state(history: &[Board], step: usize) -> Result<()> {
    let first = history
        .first()
        .ok_or_else(|| GameError::CorruptState("history is empty".into()))?;
    if !first.is_empty() {
        return Err(GameError::CorruptState(
            "history does not start with an empty board".into(),
        ));
    }
    for (i, pair) in history.windows(2).enumerate() {
        let (before, after) = (&pair[0], &pair[1]);
        let changed = before.diff(after);
        let single_move = changed.len() == 1
            && before.cell(changed[0]) == Some(Cell::Empty)
            && after.cell(changed[0]) == Some(Cell::Marked(rules::next_mark(before)));
        if !single_move {
            return Err(GameError::CorruptState(format!(
                "entry {} is not a single move after entry {}",
                i + 1,
                i
            )));
        }
    }
    if step >= history.len() {
        return Err(GameError::CorruptState(format!(
            "step {} is past the end of a history of {} entries",
            step,
            history.len()
        )));
    }
    Ok(())
}
