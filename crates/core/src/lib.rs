//! Core game logic - pure, deterministic, and testable
//!
//! Everything that decides what happens in a game of Letter Cascade lives
//! here: the grid, the letter queue, the falling letter, word detection,
//! scoring, levels and game over. There is no terminal, file or network
//! code in this crate; collaborators come in through the traits in [`ports`].
//!
//! # Module Structure
//!
//! - [`grid`]: rows x cols letter storage with bounds-checked access
//! - [`queue`]: weighted, seeded letter queue with lookahead
//! - [`falling`]: the single falling letter and its collision rule
//! - [`scanner`]: dictionary words along rows, columns and diagonals
//! - [`scoring`]: per-word points, combo, streak, multiplier, high score
//! - [`level`]: level progression and fall interval
//! - [`game_over`]: terminal conditions and write-once game-over state
//! - [`session`]: one game wiring all of the above
//! - [`config`]: session configuration (defaults, JSON, environment)
//! - [`ports`]: clock, high-score store and event sink interfaces
//!
//! # Game Rules
//!
//! - Letters spawn at the top centre and fall one cell per fall interval
//! - A letter locks when it cannot move down
//! - After each lock, every dictionary word in the grid is scored and its
//!   letters are removed
//! - Words read left to right, top to bottom, and diagonally downward
//! - The game ends when the spawn cell is blocked, the grid is 85% full,
//!   time runs out, or no empty cell is reachable
//!
//! # Example
//!
//! ```
//! use letter_cascade_core::{GameSession, SessionConfig};
//! use letter_cascade_types::GameAction;
//!
//! let mut game = GameSession::new(SessionConfig::default()).unwrap();
//! game.start();
//!
//! game.apply_action(GameAction::MoveLeft);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.score_stats().letters_placed, 1);
//! assert!(game.falling_letter().is_some());
//! ```
//!
//! # Timing
//!
//! The core owns no timers. The host calls
//! [`GameSession::update`](session::GameSession::update) every frame with the
//! elapsed time; gravity steps once the fall interval has accumulated.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod falling;
pub mod game_over;
pub mod grid;
pub mod level;
pub mod ports;
pub mod queue;
pub mod rng;
pub mod scanner;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use letter_cascade_types as types;

// Re-export commonly used types for convenience
pub use config::{optimal_cols, SessionConfig, DEFAULT_TARGET_WORDS};
pub use dictionary::{Dictionary, WordList};
pub use error::{ConfigError, StoreError};
pub use falling::{FallingLetter, FallingLetterController};
pub use game_over::{GameOverEvaluator, GameOverState};
pub use grid::{GridSnapshot, GridStore, LetterGrid};
pub use level::LevelController;
pub use ports::{
    Clock, EventLog, GameEvent, GameEvents, HighScoreStore, ManualClock, MemoryHighScoreStore,
    MonotonicClock, NoopEvents,
};
pub use queue::LetterQueueGenerator;
pub use rng::SimpleRng;
pub use scanner::{WordMatch, WordScanner};
pub use scoring::{ScoreEngine, ScoredWord};
pub use session::{GameSession, SessionBuilder};
pub use snapshot::SessionSnapshot;
