//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond small conversions, so they
//! can be shared by the gameplay core, the terminal front end, and tests.
//!
//! # Grid Dimensions
//!
//! - **Columns**: 10 by default (auto-sizing picks one of [`GRID_SIZES`])
//! - **Rows**: 14 (row 0 is the top, letters fall towards higher rows)
//! - **Spawn position**: row 0, column `cols / 2`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host pump interval (~60 FPS) |
//! | `FALL_INTERVAL_FLOOR_MS` | 250 | Fastest effective fall interval |
//! | `DEFAULT_TIME_LIMIT_MS` | 300000 | Session time limit (5 minutes) |
//! | `DEFAULT_MULTIPLIER_DURATION_MS` | 10000 | Power-up multiplier lifetime |
//!
//! # Fall Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 1000ms |
//! | 2 | 900ms |
//! | 3 | 800ms |
//! | 4 | 700ms |
//! | 5 | 600ms |
//! | 6 | 500ms |
//! | 7 | 420ms |
//! | 8 | 360ms |
//! | 9 | 310ms |
//! | 10+ | 280ms |
//!
//! Intervals are scaled by the [`Difficulty`] multiplier and clamped to
//! `FALL_INTERVAL_FLOOR_MS`.
//!
//! # Examples
//!
//! ```
//! use letter_cascade_types::{Difficulty, GameAction, Rotation, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
//!
//! assert_eq!(DEFAULT_COLS, 10);
//! assert_eq!(DEFAULT_ROWS, 14);
//! ```

use serde::Deserialize;

/// Default grid width in cells
pub const DEFAULT_COLS: u16 = 10;

/// Default grid height in cells
pub const DEFAULT_ROWS: u16 = 14;

/// Largest row or column count; positions are `i16`
pub const MAX_GRID_DIM: u16 = i16::MAX as u16;

/// Column counts the auto-sizer may pick from
pub const GRID_SIZES: [u16; 3] = [10, 12, 14];

/// Host pump interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Shortest run of letters that can form a word
pub const MIN_WORD_LEN: usize = 3;

/// Letters generated per queue refill
pub const QUEUE_BATCH_SIZE: usize = 50;

/// Upcoming letters shown in the preview
pub const NEXT_PREVIEW_LEN: usize = 3;

/// Sampling weight given to letters absent from every target word
pub const FLOOR_WEIGHT: u32 = 1;

/// Fill ratio at which the grid counts as full
pub const DEFAULT_GRID_FULL_RATIO: f64 = 0.85;

/// Session time limit (5 minutes)
pub const DEFAULT_TIME_LIMIT_MS: u64 = 300_000;

/// Completed words needed per level under the canonical progression
pub const WORDS_PER_LEVEL: u32 = 5;

/// Fall intervals by level (milliseconds per row)
///
/// Index 0 = Level 1, Index 9 = Level 10+
pub const FALL_INTERVALS: [u32; 10] = [1000, 900, 800, 700, 600, 500, 420, 360, 310, 280];

/// Effective fall interval floor (250ms)
pub const FALL_INTERVAL_FLOOR_MS: u32 = 250;

/// Cumulative score needed to leave each level under the score-threshold ladder
///
/// Index 0 = score needed to reach level 2.
pub const SCORE_THRESHOLDS: [u32; 10] = [
    1000, 2500, 5000, 10000, 15000, 20000, 25000, 30000, 35000, 40000,
];

/// Letters worth a difficulty bonus
pub const RARE_LETTERS: [char; 7] = ['Q', 'W', 'X', 'Y', 'Z', 'K', 'J'];

/// Difficulty bonus per rare letter
pub const RARE_LETTER_BONUS: u32 = 15;

/// Vowels for the perfect-word bonus (Y counts as a vowel)
pub const VOWELS: [char; 6] = ['A', 'E', 'I', 'O', 'U', 'Y'];

/// Bonus for completing a word from the target set
pub const TARGET_WORD_BONUS: u32 = 100;

/// Bonus for a word made only of vowels or only of consonants
pub const PERFECT_WORD_BONUS: u32 = 50;

/// Bonus for a palindrome
pub const PALINDROME_BONUS: u32 = 75;

/// Power-up multiplier factor (2x)
pub const DEFAULT_MULTIPLIER_FACTOR: f64 = 2.0;

/// Power-up multiplier lifetime (10 seconds)
pub const DEFAULT_MULTIPLIER_DURATION_MS: u64 = 10_000;


/// A grid coordinate, row-major with row 0 at the top
///
/// Signed so that neighbours of edge cells can be expressed and probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i16,
    pub col: i16,
}

impl Position {
    pub const fn new(row: i16, col: i16) -> Self {
        Self { row, col }
    }

    /// Position shifted by `(drow, dcol)`
    pub const fn offset(self, drow: i16, dcol: i16) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }
}

/// A letter fixed in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedLetter {
    pub character: char,
    /// Session tick (lock counter) at which the letter was placed
    pub placed_at_tick: u64,
}

/// A cell of the grid
///
/// - `None`: Empty cell
/// - `Some(PlacedLetter)`: Cell holding exactly one letter
pub type Cell = Option<PlacedLetter>;

/// Directions a falling letter can be moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Left,
    Right,
    Down,
}

impl MoveDirection {
    /// `(drow, dcol)` for one step
    pub fn delta(&self) -> (i16, i16) {
        match self {
            MoveDirection::Left => (0, -1),
            MoveDirection::Right => (0, 1),
            MoveDirection::Down => (1, 0),
        }
    }
}

/// Cosmetic orientation of the falling letter
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use letter_cascade_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Quarter turns clockwise from North
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Player actions that can be applied to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the falling letter one cell left
    MoveLeft,
    /// Move the falling letter one cell right
    MoveRight,
    /// Move the falling letter one cell down
    SoftDrop,
    /// Drop the letter to its landing cell and lock it
    HardDrop,
    /// Turn the letter 90° clockwise (cosmetic)
    RotateCw,
    /// Turn the letter 90° counter-clockwise (cosmetic)
    RotateCcw,
    /// Toggle pause state
    Pause,
    /// Start a new game with the same configuration
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase)
    ///
    /// # Examples
    ///
    /// ```
    /// use letter_cascade_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("HARDDROP"), Some(GameAction::HardDrop));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Difficulty presets scaling the fall interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl Difficulty {
    /// Parse difficulty from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "extreme" => Some(Difficulty::Extreme),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    /// Factor applied to the level's fall interval
    pub fn fall_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.3,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 0.75,
            Difficulty::Extreme => 0.55,
        }
    }
}

/// How the level number is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionRule {
    /// `level = words_completed / WORDS_PER_LEVEL + 1`
    #[default]
    WordsPerLevel,
    /// Level rises as the score crosses [`SCORE_THRESHOLDS`]
    ScoreThresholds,
}

impl ProgressionRule {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "words_per_level" | "words" => Some(ProgressionRule::WordsPerLevel),
            "score_thresholds" | "score" => Some(ProgressionRule::ScoreThresholds),
            _ => None,
        }
    }
}

/// Line directions searched for words, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanDirection {
    /// Left to right along a row
    Horizontal,
    /// Top to bottom along a column
    Vertical,
    /// Top-left to bottom-right
    DiagonalDown,
    /// Top-right to bottom-left
    DiagonalUp,
}

impl ScanDirection {
    /// `(drow, dcol)` between consecutive letters of a word
    pub fn step(&self) -> (i16, i16) {
        match self {
            ScanDirection::Horizontal => (0, 1),
            ScanDirection::Vertical => (1, 0),
            ScanDirection::DiagonalDown => (1, 1),
            ScanDirection::DiagonalUp => (1, -1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanDirection::Horizontal => "horizontal",
            ScanDirection::Vertical => "vertical",
            ScanDirection::DiagonalDown => "diagonal-down",
            ScanDirection::DiagonalUp => "diagonal-up",
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverReason {
    /// The spawn cell was occupied when a new letter was due
    GridBlocked,
    /// The grid fill ratio reached the configured threshold
    GridFull,
    /// The unpaused play time reached the configured limit
    TimeLimit,
    /// No empty cell is reachable from the spawn cell
    NoValidMoves,
    /// Every target word was completed (opt-in victory)
    AllTargetsFound,
}

impl GameOverReason {
    /// Stable reason code
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::GridBlocked => "GRID_BLOCKED",
            GameOverReason::GridFull => "GRID_FULL",
            GameOverReason::TimeLimit => "TIME_LIMIT",
            GameOverReason::NoValidMoves => "NO_VALID_MOVES",
            GameOverReason::AllTargetsFound => "ALL_TARGETS_FOUND",
        }
    }

    /// Human-readable text for the game-over screen
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::GridBlocked => "No room for the next letter",
            GameOverReason::GridFull => "The grid is full",
            GameOverReason::TimeLimit => "Time is up",
            GameOverReason::NoValidMoves => "No valid moves left",
            GameOverReason::AllTargetsFound => "Every target word found",
        }
    }
}

/// Summary recorded once when a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinalStats {
    pub score: u64,
    pub words_completed: u32,
    pub letters_placed: u32,
    pub play_time_ms: u64,
    pub level_reached: u32,
    pub max_combo: u32,
}

/// Live scoring counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreStats {
    pub score: u64,
    pub high_score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub words_completed: u32,
    pub letters_placed: u32,
    pub streak: u32,
    pub max_streak: u32,
}
