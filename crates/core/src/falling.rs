//! Falling letter controller
//!
//! Owns the single falling letter. Phases:
//!
//! ```text
//! Idle --spawn--> Active --(blocked tick | hard drop)--> Locking --lock--> Idle
//! ```
//!
//! Moves use one collision rule for input and gravity: the target cell must
//! be in bounds and empty. The letter is not part of the grid until it locks.

use tracing::debug;

use crate::grid::GridStore;
use crate::queue::LetterQueueGenerator;
use crate::types::{MoveDirection, Position, Rotation};

/// The letter currently falling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingLetter {
    pub character: char,
    pub row: i16,
    pub col: i16,
    pub rotation: Rotation,
}

impl FallingLetter {
    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerPhase {
    #[default]
    Idle,
    Active,
    Locking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(FallingLetter),
    /// Spawn cell occupied; no letter was taken from the queue
    Blocked,
    /// Controller halted after game over
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No active letter
    Idle,
    Moved,
    /// Could not move down; the letter is waiting to lock
    Landed,
}

/// A letter written into the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockedLetter {
    pub character: char,
    pub position: Position,
}

#[derive(Debug, Clone, Default)]
pub struct FallingLetterController {
    letter: Option<FallingLetter>,
    phase: ControllerPhase,
    halted: bool,
}

impl FallingLetterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    pub fn letter(&self) -> Option<FallingLetter> {
        self.letter
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Stop accepting spawns and moves
    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Drop any letter and return to a fresh controller
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Take the next letter from the queue and place it at the spawn cell.
    ///
    /// # Panics
    ///
    /// Panics if a letter is already falling or waiting to lock.
    pub fn spawn(&mut self, grid: &GridStore, queue: &mut LetterQueueGenerator) -> SpawnOutcome {
        if self.halted {
            return SpawnOutcome::Halted;
        }
        assert!(
            self.phase == ControllerPhase::Idle && self.letter.is_none(),
            "spawn while a letter is still {:?}",
            self.phase
        );

        let at = grid.spawn_position();
        if !grid.is_empty(at) {
            debug!(row = at.row, col = at.col, "spawn cell blocked");
            return SpawnOutcome::Blocked;
        }

        let letter = FallingLetter {
            character: queue.dequeue(),
            row: at.row,
            col: at.col,
            rotation: Rotation::North,
        };
        self.letter = Some(letter);
        self.phase = ControllerPhase::Active;
        debug!(letter = %letter.character, col = letter.col, "spawned");
        SpawnOutcome::Spawned(letter)
    }

    /// Move one cell if the target is in bounds and empty.
    pub fn try_move(&mut self, dir: MoveDirection, grid: &GridStore) -> bool {
        if self.halted || self.phase != ControllerPhase::Active {
            return false;
        }
        let Some(letter) = self.letter.as_mut() else {
            return false;
        };

        let (drow, dcol) = dir.delta();
        let target = letter.position().offset(drow, dcol);
        if !grid.is_empty(target) {
            return false;
        }
        letter.row = target.row;
        letter.col = target.col;
        true
    }

    /// Gravity step; a blocked step moves the letter to `Locking`.
    pub fn tick(&mut self, grid: &GridStore) -> TickOutcome {
        if self.halted || self.phase != ControllerPhase::Active {
            return match self.phase {
                ControllerPhase::Locking => TickOutcome::Landed,
                _ => TickOutcome::Idle,
            };
        }
        if self.try_move(MoveDirection::Down, grid) {
            TickOutcome::Moved
        } else {
            self.phase = ControllerPhase::Locking;
            TickOutcome::Landed
        }
    }

    /// Move down until blocked, then wait to lock. Returns rows dropped.
    pub fn hard_drop(&mut self, grid: &GridStore) -> Option<u16> {
        if self.halted || self.phase != ControllerPhase::Active {
            return None;
        }
        let mut rows = 0;
        while self.try_move(MoveDirection::Down, grid) {
            rows += 1;
        }
        self.phase = ControllerPhase::Locking;
        Some(rows)
    }

    /// Cosmetic quarter turn
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if self.halted || self.phase != ControllerPhase::Active {
            return false;
        }
        let Some(letter) = self.letter.as_mut() else {
            return false;
        };
        letter.rotation = if clockwise {
            letter.rotation.rotate_cw()
        } else {
            letter.rotation.rotate_ccw()
        };
        true
    }

    /// Row the letter would land on if dropped now
    pub fn landing_row(&self, grid: &GridStore) -> Option<i16> {
        let letter = self.letter?;
        let mut row = letter.row;
        while grid.is_empty(Position::new(row + 1, letter.col)) {
            row += 1;
        }
        Some(row)
    }

    /// Write the letter into the grid and return to `Idle`.
    ///
    /// Returns `None` when there is nothing to lock.
    pub fn lock(&mut self, grid: &mut GridStore, tick: u64) -> Option<LockedLetter> {
        if self.phase == ControllerPhase::Idle {
            return None;
        }
        let letter = self.letter.take()?;
        self.phase = ControllerPhase::Idle;

        let position = letter.position();
        grid.place(position, letter.character, tick);
        debug!(letter = %letter.character, row = position.row, col = position.col, "locked");
        Some(LockedLetter {
            character: letter.character,
            position,
        })
    }
}
