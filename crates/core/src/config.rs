//! Session configuration
//!
//! Layered: built-in defaults, then an optional JSON document, then
//! environment overrides. Call [`SessionConfig::validate`] before building a
//! session.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LETTER_CASCADE_DIFFICULTY` | `difficulty` (easy, normal, hard, extreme) |
//! | `LETTER_CASCADE_TIME_LIMIT_MS` | `time_limit_ms` (0 disables) |
//! | `LETTER_CASCADE_DIAGONALS` | `diagonal_words` (true/false/1/0) |
//! | `LETTER_CASCADE_SEED` | `seed` |
//! | `LETTER_CASCADE_PROGRESSION` | `progression` (words_per_level, score_thresholds) |

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::types::{
    Difficulty, ProgressionRule, DEFAULT_COLS, DEFAULT_GRID_FULL_RATIO,
    DEFAULT_MULTIPLIER_DURATION_MS, DEFAULT_MULTIPLIER_FACTOR, DEFAULT_ROWS,
    DEFAULT_TIME_LIMIT_MS, FLOOR_WEIGHT, GRID_SIZES, MAX_GRID_DIM, MIN_WORD_LEN,
    QUEUE_BATCH_SIZE,
};

/// Goal words used when none are configured
pub const DEFAULT_TARGET_WORDS: [&str; 7] =
    ["CHAT", "MAISON", "MUSIQUE", "JARDIN", "LIVRE", "TABLE", "PORTE"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub rows: u16,
    pub cols: u16,
    /// Derive `cols` from the target words
    pub auto_size: bool,
    pub target_words: Vec<String>,
    pub diagonal_words: bool,
    pub min_word_len: usize,
    pub grid_full_ratio: f64,
    /// `None` disables the time limit
    pub time_limit_ms: Option<u64>,
    pub progression: ProgressionRule,
    pub difficulty: Difficulty,
    pub queue_batch_size: usize,
    pub floor_weight: u32,
    pub seed: u32,
    pub multiplier_factor: f64,
    pub multiplier_duration_ms: u64,
    /// End the game as a win once every target word is found
    pub victory_on_all_targets: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            auto_size: false,
            target_words: DEFAULT_TARGET_WORDS.iter().map(|w| w.to_string()).collect(),
            diagonal_words: true,
            min_word_len: MIN_WORD_LEN,
            grid_full_ratio: DEFAULT_GRID_FULL_RATIO,
            time_limit_ms: Some(DEFAULT_TIME_LIMIT_MS),
            progression: ProgressionRule::WordsPerLevel,
            difficulty: Difficulty::Normal,
            queue_batch_size: QUEUE_BATCH_SIZE,
            floor_weight: FLOOR_WEIGHT,
            seed: 1,
            multiplier_factor: DEFAULT_MULTIPLIER_FACTOR,
            multiplier_duration_ms: DEFAULT_MULTIPLIER_DURATION_MS,
            victory_on_all_targets: false,
        }
    }
}

impl SessionConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `LETTER_CASCADE_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment, tests).
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(value) = get("LETTER_CASCADE_DIFFICULTY") {
            self.difficulty = Difficulty::from_str(&value)
                .ok_or_else(|| rejected("LETTER_CASCADE_DIFFICULTY", &value))?;
        }

        if let Some(value) = get("LETTER_CASCADE_TIME_LIMIT_MS") {
            let ms: u64 = value
                .parse()
                .map_err(|_| rejected("LETTER_CASCADE_TIME_LIMIT_MS", &value))?;
            self.time_limit_ms = if ms == 0 { None } else { Some(ms) };
        }

        if let Some(value) = get("LETTER_CASCADE_DIAGONALS") {
            self.diagonal_words = match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(rejected("LETTER_CASCADE_DIAGONALS", &value)),
            };
        }

        if let Some(value) = get("LETTER_CASCADE_SEED") {
            self.seed = value
                .parse()
                .map_err(|_| rejected("LETTER_CASCADE_SEED", &value))?;
        }

        if let Some(value) = get("LETTER_CASCADE_PROGRESSION") {
            self.progression = ProgressionRule::from_str(&value)
                .ok_or_else(|| rejected("LETTER_CASCADE_PROGRESSION", &value))?;
        }

        debug!(
            difficulty = self.difficulty.as_str(),
            progression = ?self.progression,
            seed = self.seed,
            "config overrides applied"
        );
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (rows, cols) = self.grid_dims();
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }
        if rows > MAX_GRID_DIM || cols > MAX_GRID_DIM {
            return Err(ConfigError::GridTooLarge { rows, cols });
        }
        if self.min_word_len == 0 {
            return Err(ConfigError::InvalidMinWordLen);
        }
        if (rows.max(cols) as usize) < self.min_word_len {
            return Err(ConfigError::GridTooSmall {
                rows,
                cols,
                min_word_len: self.min_word_len,
            });
        }
        if !(self.grid_full_ratio > 0.0 && self.grid_full_ratio <= 1.0) {
            return Err(ConfigError::InvalidFullRatio(self.grid_full_ratio));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.queue_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if !(self.multiplier_factor.is_finite() && self.multiplier_factor > 0.0)
            || self.multiplier_duration_ms == 0
        {
            return Err(ConfigError::InvalidMultiplier {
                factor: self.multiplier_factor,
                duration_ms: self.multiplier_duration_ms,
            });
        }
        Ok(())
    }

    /// `(rows, cols)` after auto-sizing
    pub fn grid_dims(&self) -> (u16, u16) {
        if self.auto_size {
            (self.rows, optimal_cols(&self.target_words))
        } else {
            (self.rows, self.cols)
        }
    }
}

fn rejected(key: &'static str, value: &str) -> ConfigError {
    warn!(key, value, "rejected config override");
    ConfigError::InvalidOverride {
        key,
        value: value.to_string(),
    }
}

/// Column count suited to the target words.
///
/// `ceil(longest x 1.5)` clamped to 8..=12, one wider (max 12) for more than
/// six words, then snapped to the nearest of [`GRID_SIZES`] (ties keep the
/// smaller size).
pub fn optimal_cols<S: AsRef<str>>(target_words: &[S]) -> u16 {
    let longest = target_words
        .iter()
        .map(|w| w.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    // ceil(longest * 1.5) in integers
    let mut size = ((longest * 3 + 1) / 2).clamp(8, 12) as u16;
    if target_words.len() > 6 {
        size = (size + 1).min(12);
    }

    let mut best = GRID_SIZES[0];
    for &candidate in &GRID_SIZES[1..] {
        if candidate.abs_diff(size) < best.abs_diff(size) {
            best = candidate;
        }
    }
    best
}
