//! Collaborator interfaces the session consumes or notifies
//!
//! - [`Clock`]: monotonic milliseconds, swappable for a manual clock in tests
//! - [`HighScoreStore`]: persistence for the single high-score value
//! - [`GameEvents`]: notifications for renderers, audio and analytics. Every
//!   method has a no-op default so sinks implement only what they need.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::error::StoreError;
use crate::types::{FinalStats, GameOverReason, Position};

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock, counting from construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Persistence for the high score
pub trait HighScoreStore {
    /// Stored high score, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<u64>, StoreError>;
    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    value: Arc<Mutex<Option<u64>>>,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(score: u64) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(score))),
        }
    }

    /// Last saved value
    pub fn value(&self) -> Option<u64> {
        self.value.lock().ok().and_then(|v| *v)
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        let guard = self.value.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(*guard)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        let mut guard = self.value.lock().map_err(|_| StoreError::Unavailable)?;
        *guard = Some(score);
        Ok(())
    }
}

/// Session notifications
pub trait GameEvents {
    fn on_letter_locked(&mut self, _letter: char, _at: Position) {}

    /// Fired once per match, in scan order, after scoring
    fn on_word_completed(&mut self, _word: &str, _points: u64) {}

    /// Fired once per lock with the union of matched cells, after removal
    fn on_letters_cleared(&mut self, _cells: &[Position]) {}

    fn on_level_up(&mut self, _old_level: u32, _new_level: u32) {}

    fn on_game_over(&mut self, _reason: GameOverReason, _stats: &FinalStats) {}
}

/// Ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl GameEvents for NoopEvents {}

/// Recorded notification
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LetterLocked { letter: char, at: Position },
    WordCompleted { word: String, points: u64 },
    LettersCleared { cells: Vec<Position> },
    LevelUp { old_level: u32, new_level: u32 },
    GameOver { reason: GameOverReason, stats: FinalStats },
}

/// Records events in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: GameEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|mut e| std::mem::take(&mut *e))
            .unwrap_or_default()
    }

    /// `(word, points)` of every completed word
    pub fn completed_words(&self) -> Vec<(String, u64)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::WordCompleted { word, points } => Some((word, points)),
                _ => None,
            })
            .collect()
    }
}

impl GameEvents for EventLog {
    fn on_letter_locked(&mut self, letter: char, at: Position) {
        self.push(GameEvent::LetterLocked { letter, at });
    }

    fn on_word_completed(&mut self, word: &str, points: u64) {
        self.push(GameEvent::WordCompleted {
            word: word.to_string(),
            points,
        });
    }

    fn on_letters_cleared(&mut self, cells: &[Position]) {
        self.push(GameEvent::LettersCleared {
            cells: cells.to_vec(),
        });
    }

    fn on_level_up(&mut self, old_level: u32, new_level: u32) {
        self.push(GameEvent::LevelUp {
            old_level,
            new_level,
        });
    }

    fn on_game_over(&mut self, reason: GameOverReason, stats: &FinalStats) {
        self.push(GameEvent::GameOver {
            reason,
            stats: *stats,
        });
    }
}
