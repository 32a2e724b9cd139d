//! Level progression and fall speed.
//!
//! One [`ProgressionRule`] is fixed per session. Levels never go down.

use tracing::info;

use crate::types::{
    Difficulty, ProgressionRule, FALL_INTERVALS, FALL_INTERVAL_FLOOR_MS, SCORE_THRESHOLDS,
    WORDS_PER_LEVEL,
};

/// Level before and after an increase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub old_level: u32,
    pub new_level: u32,
}

/// `level = words / WORDS_PER_LEVEL + 1`
pub fn level_for_words(words_completed: u32) -> u32 {
    words_completed / WORDS_PER_LEVEL + 1
}

/// One level per score threshold crossed, starting at 1
pub fn level_for_score(score: u64) -> u32 {
    1 + SCORE_THRESHOLDS
        .iter()
        .take_while(|&&threshold| score >= threshold as u64)
        .count() as u32
}

/// Fall interval for `level` scaled by `difficulty`, never below the floor
pub fn fall_interval_ms(level: u32, difficulty: Difficulty) -> u32 {
    let idx = (level.max(1) as usize - 1).min(FALL_INTERVALS.len() - 1);
    let scaled = (FALL_INTERVALS[idx] as f64 * difficulty.fall_multiplier()).floor() as u32;
    scaled.max(FALL_INTERVAL_FLOOR_MS)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelController {
    rule: ProgressionRule,
    difficulty: Difficulty,
    level: u32,
    fall_interval_ms: u32,
}

impl LevelController {
    pub fn new(rule: ProgressionRule, difficulty: Difficulty) -> Self {
        Self {
            rule,
            difficulty,
            level: 1,
            fall_interval_ms: fall_interval_ms(1, difficulty),
        }
    }

    pub fn reset(&mut self) {
        self.level = 1;
        self.fall_interval_ms = fall_interval_ms(1, self.difficulty);
    }

    /// Recompute the level from progress; returns the change if it rose.
    pub fn update(&mut self, words_completed: u32, score: u64) -> Option<LevelChange> {
        let target = match self.rule {
            ProgressionRule::WordsPerLevel => level_for_words(words_completed),
            ProgressionRule::ScoreThresholds => level_for_score(score),
        };
        if target <= self.level {
            return None;
        }

        let change = LevelChange {
            old_level: self.level,
            new_level: target,
        };
        self.level = target;
        self.fall_interval_ms = fall_interval_ms(target, self.difficulty);
        info!(
            old = change.old_level,
            new = change.new_level,
            interval_ms = self.fall_interval_ms,
            "level up"
        );
        Some(change)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.fall_interval_ms
    }

    pub fn rule(&self) -> ProgressionRule {
        self.rule
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_words() {
        assert_eq!(level_for_words(0), 1);
        assert_eq!(level_for_words(4), 1);
        assert_eq!(level_for_words(5), 2);
        assert_eq!(level_for_words(23), 5);
    }

    #[test]
    fn test_level_for_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(999), 1);
        assert_eq!(level_for_score(1000), 2);
        assert_eq!(level_for_score(2500), 3);
        assert_eq!(level_for_score(1_000_000), 11);
    }

    #[test]
    fn test_fall_interval_table_and_floor() {
        assert_eq!(fall_interval_ms(1, Difficulty::Normal), 1000);
        assert_eq!(fall_interval_ms(0, Difficulty::Normal), 1000);
        assert_eq!(fall_interval_ms(3, Difficulty::Easy), 1040);
        assert_eq!(fall_interval_ms(2, Difficulty::Hard), 675);
        assert_eq!(fall_interval_ms(10, Difficulty::Normal), 280);
        assert_eq!(fall_interval_ms(50, Difficulty::Normal), 280);
        assert_eq!(fall_interval_ms(10, Difficulty::Extreme), FALL_INTERVAL_FLOOR_MS);
    }

    #[test]
    fn test_update_reports_changes_only() {
        let mut level = LevelController::new(ProgressionRule::WordsPerLevel, Difficulty::Normal);
        assert_eq!(level.update(4, 0), None);
        assert_eq!(
            level.update(5, 0),
            Some(LevelChange {
                old_level: 1,
                new_level: 2
            })
        );
        assert_eq!(level.fall_interval_ms(), 900);
        assert_eq!(level.update(6, 0), None);
    }

    #[test]
    fn test_score_rule_ignores_words() {
        let mut level =
            LevelController::new(ProgressionRule::ScoreThresholds, Difficulty::Normal);
        assert_eq!(level.update(50, 0), None);
        assert_eq!(level.update(0, 5_000).map(|c| c.new_level), Some(4));
    }

    #[test]
    fn test_level_never_decreases() {
        let mut level =
            LevelController::new(ProgressionRule::ScoreThresholds, Difficulty::Normal);
        level.update(0, 10_000);
        assert_eq!(level.level(), 5);
        assert_eq!(level.update(0, 0), None);
        assert_eq!(level.level(), 5);

        level.reset();
        assert_eq!(level.level(), 1);
        assert_eq!(level.fall_interval_ms(), 1000);
    }
}
