use crate::falling::FallingLetter;
use crate::grid::GridSnapshot;
use crate::types::{GameOverReason, ScoreStats};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub grid: GridSnapshot,
    pub falling: Option<FallingLetter>,
    /// Row the falling letter would land on
    pub landing_row: Option<i16>,
    pub next_letters: Vec<char>,
    pub stats: ScoreStats,
    pub level: u32,
    pub fall_interval_ms: u32,
    pub multiplier: f64,
    pub multiplier_remaining_ms: u64,
    pub play_time_ms: u64,
    pub time_limit_ms: Option<u64>,
    pub started: bool,
    pub paused: bool,
    pub game_over: Option<GameOverReason>,
    /// Distinct target words found
    pub targets_found: usize,
    pub targets_total: usize,
    /// Words scored by the most recent lock
    pub last_words: Vec<(String, u64)>,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.started && !self.paused && self.game_over.is_none()
    }

    pub fn time_remaining_ms(&self) -> Option<u64> {
        self.time_limit_ms
            .map(|limit| limit.saturating_sub(self.play_time_ms))
    }
}
